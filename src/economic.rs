//! Fee and amount planning at a fixed fee rate

use crate::error::{Result, SignerError};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// Split of the available funds between destination, change and fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeePlan {
    pub send_amount: Integer,
    pub change_amount: Integer,
    pub fee: Integer,
}

/// Plan: ℤ × ℤ × ℤ × ℤ → ℤ × ℤ × ℤ
///
/// For available funds A, target T, fee rate f and size estimate S:
/// 1. fee = f × S
/// 2. change = A − T − fee
/// 3. If change < 0: InsufficientFunds
/// 4. Return (T, change, fee)
///
/// Negative arguments and overflowing sums are `InvalidAmount`.
pub fn plan(
    total_available: Integer,
    target_send: Integer,
    fee_rate_per_byte: Integer,
    estimated_size_bytes: Integer,
) -> Result<FeePlan> {
    for (name, value) in [
        ("target amount", target_send),
        ("fee rate", fee_rate_per_byte),
        ("size estimate", estimated_size_bytes),
    ] {
        if value < 0 {
            return Err(SignerError::InvalidAmount(format!("negative {}: {}", name, value)));
        }
    }

    let fee = fee_rate_per_byte.checked_mul(estimated_size_bytes).ok_or_else(|| {
        SignerError::InvalidAmount(format!(
            "fee {} × {} overflows",
            fee_rate_per_byte, estimated_size_bytes
        ))
    })?;

    let required = target_send.checked_add(fee).ok_or_else(|| {
        SignerError::InvalidAmount(format!("amount {} plus fee {} overflows", target_send, fee))
    })?;

    let change = total_available.checked_sub(required).ok_or_else(|| {
        SignerError::InvalidAmount(format!("{} minus {} overflows", total_available, required))
    })?;
    if change < 0 {
        return Err(SignerError::InsufficientFunds {
            available: total_available,
            required,
        });
    }

    Ok(FeePlan {
        send_amount: target_send,
        change_amount: change,
        fee,
    })
}

/// EstimateSize: ℕ × ℤ → ℤ
///
/// The size estimate scales a fixed per-input figure by the number of
/// inputs being spent.
pub fn estimate_size(input_count: usize, bytes_per_input: Integer) -> Integer {
    (input_count as Integer).saturating_mul(bytes_per_input)
}

/// Fee actually paid: Σ inputs − Σ outputs
pub fn calculate_fee(tx: &Transaction, total_input: Integer) -> Result<Integer> {
    let total_output = tx.total_output_value();
    let fee = total_input - total_output;
    if fee < 0 {
        return Err(SignerError::InsufficientFunds {
            available: total_input,
            required: total_output,
        });
    }
    Ok(fee)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_reference_values() {
        let result = plan(100000, 4000, 1, 250).unwrap();
        assert_eq!(
            result,
            FeePlan {
                send_amount: 4000,
                change_amount: 95750,
                fee: 250,
            }
        );
    }

    #[test]
    fn test_plan_insufficient() {
        let result = plan(1000, 4000, 1, 250);
        assert!(matches!(
            result,
            Err(SignerError::InsufficientFunds { available: 1000, required: 4250 })
        ));
    }

    #[test]
    fn test_plan_exact_funds_zero_change() {
        let result = plan(4250, 4000, 1, 250).unwrap();
        assert_eq!(result.change_amount, 0);
        assert_eq!(result.fee, 250);
    }

    #[test]
    fn test_plan_one_short() {
        assert!(plan(4249, 4000, 1, 250).is_err());
    }

    #[test]
    fn test_plan_fee_rate_scales() {
        let result = plan(100000, 4000, 3, 510).unwrap();
        assert_eq!(result.fee, 1530);
        assert_eq!(result.change_amount, 100000 - 4000 - 1530);
    }

    #[test]
    fn test_plan_fee_overflow() {
        let result = plan(100000, 4000, Integer::MAX, 2);
        assert!(matches!(result, Err(SignerError::InvalidAmount(_))));

        let result = plan(100000, Integer::MAX, 1, 250);
        assert!(matches!(result, Err(SignerError::InvalidAmount(_))));
    }

    #[test]
    fn test_plan_negative_arguments() {
        assert!(matches!(plan(100000, -1, 1, 250), Err(SignerError::InvalidAmount(_))));
        assert!(matches!(plan(100000, 4000, -1, 250), Err(SignerError::InvalidAmount(_))));
        assert!(matches!(plan(100000, 4000, 1, -250), Err(SignerError::InvalidAmount(_))));
    }

    #[test]
    fn test_estimate_size() {
        assert_eq!(estimate_size(1, 255), 255);
        assert_eq!(estimate_size(3, 254), 762);
        assert_eq!(estimate_size(0, 255), 0);
    }

    #[test]
    fn test_calculate_fee() {
        let tx = Transaction {
            version: 1,
            inputs: vec![],
            outputs: vec![
                TransactionOutput { value: 4000, script_pubkey: vec![] },
                TransactionOutput { value: 95750, script_pubkey: vec![] },
            ],
            lock_time: 0,
        };
        assert_eq!(calculate_fee(&tx, 100000).unwrap(), 250);
        assert!(calculate_fee(&tx, 99000).is_err());
    }
}
