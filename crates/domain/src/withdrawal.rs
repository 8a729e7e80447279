// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Withdrawal request payloads.
//!
//! A request is only checked for shape here. Moving money is not the
//! concern of this system; the validated request is recorded in the audit
//! trail of an accepted withdrawal and nothing else.

use crate::error::DomainError;

/// Largest accepted amount, in minor units (one trillion major units).
const MAX_AMOUNT_CENTS: u64 = 100_000_000_000_000;

/// A positive withdrawal amount held in minor units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WithdrawalAmount {
    cents: u64,
}

impl WithdrawalAmount {
    /// Builds an amount from a decimal value in major units, rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the value is not finite, rounds
    /// to zero or less, or exceeds the accepted maximum.
    pub fn from_decimal(amount: f64) -> Result<Self, DomainError> {
        if !amount.is_finite() {
            return Err(DomainError::InvalidAmount(amount.to_string()));
        }

        let rounded: f64 = (amount * 100.0).round();
        #[allow(clippy::cast_precision_loss)]
        let too_large: bool = rounded > MAX_AMOUNT_CENTS as f64;
        if rounded < 1.0 || too_large {
            return Err(DomainError::InvalidAmount(amount.to_string()));
        }

        // Range checked above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let cents: u64 = rounded as u64;
        Ok(Self { cents })
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.cents
    }
}

impl std::fmt::Display for WithdrawalAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

/// Bank transfer details as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BankTransfer {
    /// The receiving bank.
    pub bank: String,
    /// The receiving account number.
    pub account_number: String,
    /// Optional payment reference.
    pub reference: Option<String>,
    /// Optional contact phone.
    pub phone: Option<String>,
    /// Optional account holder first name.
    pub first_name: Option<String>,
    /// Optional account holder last name.
    pub last_name: Option<String>,
}

/// Crypto transfer details as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CryptoTransfer {
    /// The wallet or network name.
    pub crypto_wallet: String,
    /// The receiving address.
    pub wallet_address: String,
}

/// Where the withdrawn funds go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayoutDestination {
    /// A bank transfer.
    Bank(BankTransfer),
    /// A crypto transfer.
    Crypto(CryptoTransfer),
}

impl PayoutDestination {
    /// Returns the wire name of the payout method.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::Bank(_) => "bank",
            Self::Crypto(_) => "crypto",
        }
    }
}

/// A shape-validated withdrawal request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRequest {
    /// The requested amount.
    pub amount: WithdrawalAmount,
    /// The payout destination.
    pub destination: PayoutDestination,
}

impl WithdrawalRequest {
    /// Returns a summary safe for logs and audit records.
    ///
    /// Account numbers and wallet addresses are masked to their last four
    /// characters.
    #[must_use]
    pub fn masked_summary(&self) -> String {
        match &self.destination {
            PayoutDestination::Bank(bank) => format!(
                "amount={} method=bank bank={} account={}",
                self.amount,
                bank.bank,
                mask(&bank.account_number)
            ),
            PayoutDestination::Crypto(crypto) => format!(
                "amount={} method=crypto wallet={} address={}",
                self.amount,
                crypto.crypto_wallet,
                mask(&crypto.wallet_address)
            ),
        }
    }
}

fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let visible: usize = chars.len().min(4);
    let tail: String = chars[chars.len() - visible..].iter().collect();
    format!("****{tail}")
}

fn required(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingPayoutField { field });
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validates a submitted withdrawal payload.
///
/// Only the details block matching `method` is inspected.
///
/// # Arguments
///
/// * `amount` - The amount in major units
/// * `method` - `"bank"` or `"crypto"`
/// * `bank` - Bank details, required for `"bank"`
/// * `crypto` - Crypto details, required for `"crypto"`
///
/// # Errors
///
/// Returns an error if:
/// - The amount is not a positive finite value
/// - The method is unknown
/// - The details for the selected method are missing or have empty
///   required fields
pub fn validate_withdrawal_request(
    amount: f64,
    method: &str,
    bank: Option<&BankTransfer>,
    crypto: Option<&CryptoTransfer>,
) -> Result<WithdrawalRequest, DomainError> {
    let amount: WithdrawalAmount = WithdrawalAmount::from_decimal(amount)?;

    let destination: PayoutDestination = match method {
        "bank" => {
            let details: &BankTransfer = bank.ok_or(DomainError::MissingPayoutDetails {
                method: String::from("bank"),
            })?;
            PayoutDestination::Bank(BankTransfer {
                bank: required("bank", &details.bank)?,
                account_number: required("accountNumber", &details.account_number)?,
                reference: optional(details.reference.as_ref()),
                phone: optional(details.phone.as_ref()),
                first_name: optional(details.first_name.as_ref()),
                last_name: optional(details.last_name.as_ref()),
            })
        }
        "crypto" => {
            let details: &CryptoTransfer = crypto.ok_or(DomainError::MissingPayoutDetails {
                method: String::from("crypto"),
            })?;
            PayoutDestination::Crypto(CryptoTransfer {
                crypto_wallet: required("cryptoWallet", &details.crypto_wallet)?,
                wallet_address: required("walletAddress", &details.wallet_address)?,
            })
        }
        other => return Err(DomainError::UnknownPayoutMethod(other.to_string())),
    };

    Ok(WithdrawalRequest {
        amount,
        destination,
    })
}
