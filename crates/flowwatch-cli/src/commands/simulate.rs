use flowwatch_core::{TradeDate, ValidationError};
use flowwatch_ml::FlowSimulator;
use serde_json::json;

use crate::cli::SimulateArgs;
use crate::error::CliError;

use super::CommandResult;

pub fn run(args: &SimulateArgs) -> Result<CommandResult, CliError> {
    let start = TradeDate::parse(&args.start)?;
    check_args(args)?;

    let mut simulator = FlowSimulator::new(args.seed);
    if let Some(rate) = args.anomaly_rate {
        simulator = simulator.with_anomaly_rate(rate);
    }

    let flows = simulator.daily_flows(start, args.days);
    let bars = simulator.price_series(args.start_price, args.bars);

    let data = json!({
        "seed": args.seed,
        "flows": flows,
        "bars": bars,
    });

    Ok(CommandResult::ok(data))
}

fn check_args(args: &SimulateArgs) -> Result<(), ValidationError> {
    if let Some(rate) = args.anomaly_rate {
        if !rate.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                field: "anomaly_rate",
            });
        }
        if !(0.0..=1.0).contains(&rate) {
            return Err(ValidationError::InvalidConfig {
                field: "anomaly_rate",
                reason: format!("{rate} is not a probability in [0, 1]"),
            });
        }
    }
    if !args.start_price.is_finite() {
        return Err(ValidationError::NonFiniteValue {
            field: "start_price",
        });
    }
    if args.start_price < 0.0 {
        return Err(ValidationError::NegativeValue {
            field: "start_price",
        });
    }
    Ok(())
}
