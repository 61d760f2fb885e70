/// quick start - one year of a savings account
use savings_accrual_rs::{compute_savings, CalculationInput, Decimal, Money};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 100,000 THB at 1% for 2025
    let input = CalculationInput::builder()
        .principal(Money::from_major(100_000))
        .annual_rate_pct(Decimal::ONE)
        .start_date("2025-01-01")
        .end_date("2025-12-31")
        .build()?;

    let result = compute_savings(&input)?;

    for payout in &result.payouts {
        println!(
            "{}  gross {:>10}  tax {:>8}  balance {:>12}",
            payout.date, payout.gross_interest, payout.tax, payout.balance_after_payout
        );
    }
    println!("ending balance: {}", result.ending_balance);

    Ok(())
}
