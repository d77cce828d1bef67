// Output module
pub mod table;

pub use table::{
    AlertRow, AnomalyRow, OutputFormat, ParamRow, ReadingRow, RuleRow, SensorRow, StatsRow,
};
