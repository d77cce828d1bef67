use crate::alerts::rules::{AlertRule, AlertRuleSet, AlertRuleType};
use crate::alerts::{NotificationDispatcher, TriggeredAlert};
use crate::cli::RulesAction;
use crate::config::Config;
use crate::config::settings::AlertRuleEntry;
use crate::output::RuleRow;
use crate::utils::time::now_second;
use anyhow::{Context, Result, bail};
use std::path::Path;
use tabled::Table;

pub async fn handle_rules_command(
    action: RulesAction,
    config: &mut Config,
    config_path: &Path,
    json: bool,
) -> Result<()> {
    match action {
        RulesAction::List => {
            let rules = load_rules(config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(rules.rules())?);
            } else if rules.rules().is_empty() {
                println!("No alerts configured yet.");
            } else {
                let rows: Vec<RuleRow> = rules
                    .rules()
                    .iter()
                    .enumerate()
                    .map(|(i, r)| RuleRow::from_rule(i, r))
                    .collect();
                println!("{}", Table::new(rows));
            }
        }

        RulesAction::Add {
            sensor,
            rule_type,
            threshold,
            label,
        } => {
            let rule_type: AlertRuleType = rule_type.parse()?;
            let mut rule = AlertRule::new(sensor, rule_type, threshold);
            rule.label = label;

            // Validate through the rule set before persisting.
            let mut rules = load_rules(config)?;
            rules.add_rule(rule.clone()).context("invalid alert rule")?;

            config.alert_rules.push(AlertRuleEntry::from_rule(&rule));
            config.save_to(config_path)?;
            println!(
                "Alert configured: {} {} {}",
                rule.sensor_id, rule.rule_type, rule.threshold
            );
        }

        RulesAction::Remove { index } => {
            let mut rules = load_rules(config)?;
            if !rules.remove_rule(index) {
                bail!(
                    "no alert rule at index {index} ({} configured)",
                    config.alert_rules.len()
                );
            }
            config.alert_rules.remove(index);
            config.save_to(config_path)?;
            println!("Removed alert rule {index}");
        }

        RulesAction::Test { channel } => {
            let dispatcher = NotificationDispatcher::from_config(&config.notifications);
            let alert = TriggeredAlert {
                sensor_name: "Test Sensor".to_string(),
                message: "sensorhub notification test".to_string(),
                triggered_at: now_second(),
            };
            let delivered = dispatcher.send(&alert, &channel).await?;
            if delivered {
                println!("Test alert delivered via {channel}");
            } else {
                println!("Test alert could NOT be delivered via {channel}");
            }
        }
    }

    Ok(())
}

fn load_rules(config: &Config) -> Result<AlertRuleSet> {
    let mut rules = AlertRuleSet::new();
    for entry in &config.alert_rules {
        rules.add_rule(entry.to_rule()?)?;
    }
    Ok(rules)
}
