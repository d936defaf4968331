//! API Request/Response DTOs
//!
//! JSON shapes for the game-facing endpoints. Field names are camelCase
//! to match the original client contract (`playerAddress`,
//! `claimedAmountBTM`, ...). Domain types never leak raw — requests
//! carry plain strings that handlers parse into validated types.

use serde::{Deserialize, Serialize};

use crate::domain::player::PointCategory;

/// POST /add-points request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPointsRequest {
    /// Player chain address (validated by the handler).
    pub player_address: String,
    /// Points to credit. Signed so a negative value is rejected with a
    /// clear 400 instead of a serde type error.
    pub points_to_add: i64,
    /// Activity category; defaults to pvp for older game clients that
    /// never send it.
    #[serde(default)]
    pub category: Option<PointCategory>,
}

/// POST /add-points response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPointsResponse {
    pub success: bool,
    /// New total in the credited category.
    pub new_total_points: u64,
}

/// Balance pair nested in the /get-points response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsDto {
    pub pvp_points: u64,
    pub pve_points: u64,
}

/// GET /get-points/:address response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPointsResponse {
    pub success: bool,
    pub points: PointsDto,
}

/// POST /claim-rewards request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    pub player_address: String,
    /// Optional idempotency key; echoed on Uncertain outcomes so a
    /// client retry maps to the original attempt.
    #[serde(default)]
    pub request_id: Option<String>,
}

/// POST /claim-rewards success response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub success: bool,
    /// Whole BTM units transferred.
    #[serde(rename = "claimedAmountBTM")]
    pub claimed_amount_btm: u64,
    pub transaction_hash: String,
}

/// GET /balance/:address response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub address: String,
    /// Raw balance in base units (decimal string — exceeds JS number range).
    pub balance: String,
    /// Human-readable whole-token balance.
    pub formatted_balance: String,
}

/// GET /token-info response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfoResponse {
    pub name: String,
    pub symbol: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub contract_address: String,
    pub decimals: u8,
    /// Total supply in whole tokens.
    pub total_supply: String,
}

/// Unresolved claim marker as exposed to operators.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingClaimDto {
    pub request_id: String,
    pub category: String,
    /// Whole BTM units that may or may not have been transferred.
    pub units: u64,
    pub reason: String,
    /// RFC 3339 timestamp of when the claim went uncertain.
    pub at: String,
}

/// GET /admin/pending-claim/:address response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingClaimResponse {
    pub success: bool,
    /// `null` when the player has no unresolved claim.
    pub pending: Option<PendingClaimDto>,
}

/// POST /admin/resolve-claim request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveClaimRequest {
    pub player_address: String,
    /// `true` when the operator found the transfer confirmed on chain;
    /// `false` when it provably never landed.
    pub transferred: bool,
}

/// POST /admin/resolve-claim response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveClaimResponse {
    pub success: bool,
    /// The marker that was resolved, or `null` if none existed.
    pub resolved: Option<PendingClaimDto>,
}

/// GET /health response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error envelope for all non-2xx responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    /// Human-readable message, safe for clients.
    pub error: String,
    /// Stable machine-readable code (`INSUFFICIENT_POINTS`, ...).
    pub error_code: String,
}

/// Format a base-unit amount as a whole-token decimal string.
///
/// `1_500_000_000_000_000_000` at 18 decimals renders as `"1.5"`;
/// trailing fractional zeros are trimmed, whole amounts carry no point.
pub fn format_base_units(amount: u128, decimals: u8) -> String {
    let scale = 10u128.pow(u32::from(decimals).min(38));
    if decimals == 0 || scale == 0 {
        return amount.to_string();
    }
    let whole = amount / scale;
    let frac = amount % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let frac_str = format!("{frac:0>width$}", width = decimals as usize);
    let trimmed = frac_str.trim_end_matches('0');
    format!("{whole}.{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_whole_amount() {
        assert_eq!(format_base_units(2_000_000_000_000_000_000, 18), "2");
    }

    #[test]
    fn test_format_fractional_amount() {
        assert_eq!(format_base_units(1_500_000_000_000_000_000, 18), "1.5");
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_base_units(0, 18), "0");
    }

    #[test]
    fn test_format_sub_unit_amount() {
        assert_eq!(format_base_units(1, 18), "0.000000000000000001");
    }

    #[test]
    fn test_format_zero_decimals() {
        assert_eq!(format_base_units(42, 0), "42");
    }

    #[test]
    fn test_claim_response_field_name() {
        let resp = ClaimResponse {
            success: true,
            claimed_amount_btm: 1,
            transaction_hash: "0xabc".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"claimedAmountBTM\":1"));
        assert!(json.contains("\"transactionHash\""));
    }
}
