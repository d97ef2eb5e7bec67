/// Log level handed to the sign client on init
pub const DEFAULT_LOGGER: &str = "debug";

pub const DEFAULT_RELAY_URL: &str = "wss://relay.walletconnect.com";

pub const CHIA_NAMESPACE: &str = "chia";
pub const DEFAULT_CHAIN_ID: &str = "chia:testnet";

pub const CHIA_SLIP44: u32 = 8444;
pub const CHIA_LOGO: &str =
    "https://www.chia.net/wp-content/uploads/2022/09/chia-logo.svg";
pub const CHIA_RGB: &str = "92, 170, 98";

// https://github.com/WalletConnect/walletconnect-monorepo/blob/v2.0/packages/utils/src/errors.ts
pub const USER_DISCONNECTED_CODE: i64 = 6000;
pub const USER_DISCONNECTED_MESSAGE: &str = "User disconnected.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayerRegion {
    pub value: Option<&'static str>,
    pub label: &'static str,
}

pub const REGIONALIZED_RELAYER_ENDPOINTS: [RelayerRegion; 4] = [
    RelayerRegion {
        value: Some(DEFAULT_RELAY_URL),
        label: "Default",
    },
    RelayerRegion {
        value: Some("wss://us-east-1.relay.walletconnect.com/"),
        label: "US",
    },
    RelayerRegion {
        value: Some("wss://eu-central-1.relay.walletconnect.com/"),
        label: "EU",
    },
    RelayerRegion {
        value: Some("wss://ap-southeast-1.relay.walletconnect.com/"),
        label: "Asia Pacific",
    },
];
