use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "sensorhub")]
#[command(about = "IoT Sensor Monitoring Tool")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON output format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported platforms and their connection parameters
    Platforms,

    /// Connect to a platform and list its sensors
    Sensors {
        /// Platform to connect to (aws-iot, azure-iot, thingspeak, mqtt, custom-api)
        #[arg(long)]
        platform: String,

        /// Connection parameter override (KEY=VALUE, repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,
    },

    /// Poll latest readings, evaluate alert rules, and notify on triggers
    Monitor {
        #[arg(long)]
        platform: String,

        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Number of polling cycles to run
        #[arg(long, default_value_t = 1)]
        cycles: u32,

        /// Only monitor these sensor ids (repeatable; default all discovered)
        #[arg(long = "sensor")]
        sensors: Vec<String>,

        /// Notification channel for triggered alerts (email, sms, webhook)
        #[arg(long)]
        channel: Option<String>,
    },

    /// Fetch a sensor's historical range, show statistics and anomalies
    History {
        #[arg(long)]
        platform: String,

        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Sensor id to query
        #[arg(long)]
        sensor: String,

        /// How far back to query, in minutes
        #[arg(long, default_value_t = 60)]
        minutes: i64,

        /// Z-score threshold for anomaly flagging
        #[arg(long, default_value_t = 2.0)]
        z_threshold: f64,

        /// Export the fetched series to this file
        #[arg(long)]
        export: Option<String>,

        /// Export format (csv, json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Import a series from a file and summarize it
    Import {
        /// Sensor id to file the imported rows under
        #[arg(long)]
        sensor: String,

        /// File to import
        #[arg(long)]
        input: String,

        /// Import format (csv, json)
        #[arg(long, default_value = "csv")]
        format: String,
    },

    /// Manage alert rules
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
pub enum RulesAction {
    /// Show configured alert rules
    List,
    /// Add an alert rule
    Add {
        /// Sensor id the rule applies to
        #[arg(long)]
        sensor: String,

        /// Rule type: high (threshold high), low (threshold low), rate (change rate)
        #[arg(long = "type")]
        rule_type: String,

        /// Threshold value
        #[arg(long)]
        threshold: f64,

        /// Optional label shown in listings
        #[arg(long)]
        label: Option<String>,
    },
    /// Remove an alert rule by its index (see `rules list`)
    Remove {
        index: usize,
    },
    /// Send a test alert through a notification channel
    Test {
        /// Channel to exercise (email, sms, webhook)
        #[arg(long, default_value = "email")]
        channel: String,
    },
}
