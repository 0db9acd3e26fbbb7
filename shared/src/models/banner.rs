//! Banner Model

use serde::{Deserialize, Serialize};

/// Promotional banner shown on the storefront landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub title: String,
    /// Public URL of the banner image
    pub src: String,
    pub text: String,
}
