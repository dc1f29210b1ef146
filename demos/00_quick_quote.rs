/// quick quote - interest, EMI and the month-by-month plan for a loan
use chrono::NaiveDate;
use srivari_lending::{calculate, ClientConfig, RepaymentPlan};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ClientConfig::default();
    let symbol = &config.display.currency_symbol;

    // raw form input, exactly as typed
    let quote = calculate("120000", "12", "10")?;
    let shown = quote.formatted(symbol);
    println!("=== loan quote ===");
    println!("interest:      {}", shown.interest);
    println!("total payable: {}", shown.total_payable);
    println!("monthly EMI:   {}", shown.monthly_installment);

    let start = NaiveDate::from_ymd_opt(2024, 1, 31).ok_or("bad date")?;
    let plan = RepaymentPlan::generate(quote, start)?;
    println!("\nclose date: {}", plan.close_date);
    for row in &plan.installments {
        println!(
            "#{:>2}  {}  {:>10}  balance {}",
            row.number,
            row.due_date,
            row.amount.format_with_symbol(symbol),
            row.balance_after.format_with_symbol(symbol)
        );
    }

    // invalid input reports every bad field at once
    if let Err(err) = calculate("", "abc", "0") {
        println!("\nvalidation:\n{}", err.user_message());
    }

    Ok(())
}
