use tforge_composer::RawSelection;
use tforge_derive::api_model;
use tforge_pipeline::DeployReport;

#[api_model(rename_all = "snake_case", deny_unknown_fields = false)]
/// Token parameters and capability toggles
pub struct CreateTokenRequest {
    /// Display name, at most 64 characters
    pub token_name: String,
    /// Ticker, 1 to 5 characters
    pub symbol: String,
    pub initial_supply: u64,
    /// Between 1 and 18
    pub decimals: u8,
    /// `tz1`, `tz2` or `tz3` account that administers the token and pays for origination
    pub initial_owner: String,
    #[serde(default)]
    pub can_mint: bool,
    #[serde(default)]
    pub can_pause: bool,
    #[serde(default)]
    pub blacklist: bool,
    #[serde(default)]
    pub burn: bool,
    /// `https`, `http` or `ipfs` URI; a default logo is used when omitted
    #[serde(default)]
    pub icon: Option<String>,
}

impl From<CreateTokenRequest> for RawSelection {
    fn from(request: CreateTokenRequest) -> Self {
        Self {
            token_name: request.token_name,
            symbol: request.symbol,
            initial_supply: request.initial_supply,
            decimals: request.decimals,
            initial_owner: request.initial_owner,
            can_mint: request.can_mint,
            can_pause: request.can_pause,
            blacklist: request.blacklist,
            burn: request.burn,
            icon: request.icon,
        }
    }
}

#[api_model]
/// Deployment result
pub struct CreateTokenResponse {
    /// Originated `KT1` address, or null when the deployer reported none
    #[serde(rename = "contractAddress/errorMessage")]
    pub contract_address: Option<String>,
    /// `deployed`, `rejected`, `terminated`, `marker_missing` or `malformed_address`
    pub outcome: String,
    pub contract_id: String,
    /// SHA-256 of the generated contract source
    pub fingerprint: String,
}

impl From<DeployReport> for CreateTokenResponse {
    fn from(report: DeployReport) -> Self {
        Self {
            contract_address: report.outcome.address().map(str::to_owned),
            outcome: report.outcome.label().to_owned(),
            contract_id: report.contract_id,
            fingerprint: report.fingerprint,
        }
    }
}

#[api_model]
/// Error body
pub struct ErrorResponse {
    /// Machine-readable error kind
    pub error: String,
    pub detail: String,
}
