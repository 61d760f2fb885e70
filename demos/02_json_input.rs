/// json in, json out - the shape a form layer submits
use savings_accrual_rs::{compute_savings, CalculationInput};
use tracing_subscriber::EnvFilter;

const REQUEST: &str = r#"{
    "principalStart": "200000",
    "annualRatePct": "2.2",
    "startDate": "2025-01-01",
    "endDate": "2025-12-31",
    "events": [
        { "date": "2025-03-15", "type": "deposit", "amount": "50000" },
        { "date": "2025-09-01", "type": "withdraw", "amount": "30000" }
    ],
    "apply20kRule": true,
    "overrideKeepCompounding": false,
    "withholdingTax": { "enabled": false, "rate": "0" },
    "timezone": "Asia/Bangkok"
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let input = CalculationInput::from_json(REQUEST)?;
    let result = compute_savings(&input)?;

    println!("{}", result.to_json_pretty()?);

    Ok(())
}
