//! Input validation shared by the call encoders.
//!
//! Inputs arrive as JSON values so callers passing through untrusted data get
//! the same checks a dynamically typed caller would. The order of checks is
//! fixed and the first failure is returned:
//!
//! 1. plan id format
//! 2. subscription ids is an array
//! 3. amounts is an array (billing with amounts only)
//! 4. equal lengths (billing with amounts only)
//! 5. per index: subscription id format, then amount

use alloy::primitives::{B256, U256};
use serde_json::Value;

use crate::error::{Error, Result};

const SUBSCRIPTION_IDS: &str = "subscriptionIds";
const AMOUNTS: &str = "amounts";

/// Largest float that still represents every smaller integer exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// True for `0x` followed by exactly 64 hex digits.
pub fn is_hash(value: &str) -> bool {
    value.len() == 66
        && value.starts_with("0x")
        && value[2..].bytes().all(|b| b.is_ascii_hexdigit())
}

/// Render a value the way it appears in error messages: strings verbatim,
/// integral floats without a fraction, anything else as JSON.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 => format!("{:.0}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn parse_hash(value: &Value) -> Option<B256> {
    match value {
        Value::String(s) if is_hash(s) => s.parse().ok(),
        _ => None,
    }
}

/// Positive integer given as a decimal string (optional leading `+`) or as a
/// JSON number without a fractional part.
pub fn parse_amount(value: &Value) -> Option<U256> {
    let amount = match value {
        Value::String(s) => {
            let digits = s.strip_prefix('+').unwrap_or(s);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            U256::from_str_radix(digits, 10).ok()?
        }
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(v), _) => U256::from(v),
            (None, Some(f)) if f.fract() == 0.0 && f > 0.0 && f <= MAX_SAFE_INTEGER => {
                U256::from(f as u64)
            }
            _ => return None,
        },
        _ => return None,
    };
    (amount >= U256::from(1)).then_some(amount)
}

fn validate_plan_id(plan_id: &Value) -> Result<B256> {
    parse_hash(plan_id).ok_or_else(|| Error::InvalidPlanId(display(plan_id)))
}

fn as_array<'a>(value: &'a Value, name: &str) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| Error::NotAnArray(name.to_string()))
}

fn validate_subscription_id(value: &Value) -> Result<B256> {
    parse_hash(value).ok_or_else(|| Error::InvalidSubscriptionId(display(value)))
}

/// Arguments of a `terminate` or fixed-recurring `bill` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionArgs {
    pub plan_id: B256,
    pub subscription_ids: Vec<B256>,
}

/// Arguments of a `bill` call that carries per-subscription amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingArgs {
    pub plan_id: B256,
    pub subscription_ids: Vec<B256>,
    pub amounts: Vec<U256>,
}

/// Validate a plan id and a list of subscription ids.
pub fn validate_subscriptions(plan_id: &Value, subscription_ids: &Value) -> Result<SubscriptionArgs> {
    let plan_id = validate_plan_id(plan_id)?;
    let subscription_ids = as_array(subscription_ids, SUBSCRIPTION_IDS)?
        .iter()
        .map(validate_subscription_id)
        .collect::<Result<Vec<_>>>()?;

    Ok(SubscriptionArgs {
        plan_id,
        subscription_ids,
    })
}

/// Validate a plan id with parallel lists of subscription ids and amounts.
pub fn validate_billing(plan_id: &Value, subscription_ids: &Value, amounts: &Value) -> Result<BillingArgs> {
    let plan_id = validate_plan_id(plan_id)?;
    let ids = as_array(subscription_ids, SUBSCRIPTION_IDS)?;
    let raw_amounts = as_array(amounts, AMOUNTS)?;

    if ids.len() != raw_amounts.len() {
        return Err(Error::LengthMismatch(
            SUBSCRIPTION_IDS.to_string(),
            AMOUNTS.to_string(),
        ));
    }

    let mut subscription_ids = Vec::with_capacity(ids.len());
    let mut amounts = Vec::with_capacity(ids.len());
    for (id, amount) in ids.iter().zip(raw_amounts) {
        subscription_ids.push(validate_subscription_id(id)?);
        amounts.push(parse_amount(amount).ok_or_else(|| Error::InvalidAmount(display(amount)))?);
    }

    Ok(BillingArgs {
        plan_id,
        subscription_ids,
        amounts,
    })
}
