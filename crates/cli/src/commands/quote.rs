//! Offline mint and burn quotes.

use anyhow::Result;
use pegkeeper_model::PegParameters;
use rust_decimal::Decimal;

use crate::cli::{AmountArgs, OutputFormat};
use crate::output::{format_quote_detail, QuoteSummary};

fn per_token(collateral: Decimal, tokens: Decimal) -> Decimal {
    collateral.checked_div(tokens).unwrap_or_default()
}

fn print_quote(quote: &QuoteSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => {
            println!("{}", format_quote_detail(quote));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(quote)?;
            println!("{}", json);
        }
    }
    Ok(())
}

pub fn build_mint_quote(args: &AmountArgs, params: &PegParameters) -> Result<QuoteSummary> {
    let collateral = params.mint_cost(args.amount)?;
    Ok(QuoteSummary {
        operation: "mint",
        token_amount: args.amount,
        collateral,
        price_per_token: per_token(collateral, args.amount),
        params: *params,
    })
}

pub fn build_burn_quote(args: &AmountArgs, params: &PegParameters) -> Result<QuoteSummary> {
    let collateral = params.burn_return(args.amount)?;
    Ok(QuoteSummary {
        operation: "burn",
        token_amount: args.amount,
        collateral,
        price_per_token: per_token(collateral, args.amount),
        params: *params,
    })
}

pub fn run_quote_mint(args: &AmountArgs, params: &PegParameters, format: OutputFormat) -> Result<()> {
    print_quote(&build_mint_quote(args, params)?, format)
}

pub fn run_quote_burn(args: &AmountArgs, params: &PegParameters, format: OutputFormat) -> Result<()> {
    print_quote(&build_burn_quote(args, params)?, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(s: &str) -> AmountArgs {
        AmountArgs { amount: s.parse().unwrap() }
    }

    #[test]
    fn test_mint_quote_includes_reserve_premium() {
        let quote = build_mint_quote(&amount("1"), &PegParameters::default()).unwrap();
        assert_eq!(quote.collateral, "12.1".parse::<Decimal>().unwrap());
        assert_eq!(quote.price_per_token, "12.1".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_burn_quote_pays_peg() {
        let quote = build_burn_quote(&amount("2"), &PegParameters::default()).unwrap();
        assert_eq!(quote.collateral, Decimal::from(22));
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(build_mint_quote(&amount("-1"), &PegParameters::default()).is_err());
    }
}
