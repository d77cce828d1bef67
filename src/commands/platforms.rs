use crate::config::platforms::platform_registry;
use crate::output::ParamRow;
use anyhow::Result;
use tabled::Table;

pub fn handle_platforms_command(json: bool) -> Result<()> {
    if json {
        let listing: Vec<serde_json::Value> = platform_registry()
            .iter()
            .map(|spec| {
                serde_json::json!({
                    "platform": spec.kind.slug(),
                    "name": spec.kind.display_name(),
                    "description": spec.description,
                    "params": spec.params.iter().map(|p| serde_json::json!({
                        "key": p.key,
                        "label": p.label,
                        "default": p.default,
                        "env_var": p.env_var,
                        "sensitive": p.sensitive,
                    })).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for spec in platform_registry() {
        println!("{} ({})", spec.kind.display_name(), spec.kind.slug());
        println!("  {}", spec.description);
        println!("{}", Table::new(ParamRow::from_spec(spec)));
        println!();
    }

    Ok(())
}
