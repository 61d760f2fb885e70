/// the 20,000 THB exemption: simple interest after the threshold vs keeping compounding
use savings_accrual_rs::{compute_savings, CalculationInput, Decimal, Money};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let builder = || {
        CalculationInput::builder()
            .principal(Money::from_major(2_000_000))
            .annual_rate_pct(Decimal::from(5))
            .start_date("2025-01-01")
            .tenure_months(24)
    };

    let with_rule = compute_savings(&builder().build()?)?;
    let keep_compounding = compute_savings(&builder().override_keep_compounding(true).build()?)?;

    println!("--- 20k rule applied ---");
    for payout in &with_rule.payouts {
        println!(
            "{}  gross {:>10}  tax {:>9}  ytd {:>10}  {:?} / {:?}",
            payout.date,
            payout.gross_interest,
            payout.tax,
            payout.cumulative_ytd_gross,
            payout.tax_status,
            payout.interest_method
        );
    }
    for year in &with_rule.year_summaries {
        println!("{}  {:?}  net {}  closing {}", year.year, year.mode, year.net_interest, year.closing_balance);
    }

    println!("--- override: keep compounding ---");
    println!("ending balance: {}", keep_compounding.ending_balance);
    println!("difference:     {}", keep_compounding.ending_balance - with_rule.ending_balance);

    Ok(())
}
