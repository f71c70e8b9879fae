use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{SynthError, SynthResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum PaymentMode {
    #[serde(rename = "UPI")]
    Upi,
    Card,
    NetBanking,
    Wallets,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum FieldKind {
    Input {
        placeholder: Option<&'static str>,
        max_len: Option<usize>,
    },
    Select {
        options: &'static [&'static str],
    },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FormField {
    pub label: &'static str,
    pub kind: FieldKind,
}

const fn input(label: &'static str, placeholder: Option<&'static str>, max_len: Option<usize>) -> FormField {
    FormField {
        label,
        kind: FieldKind::Input {
            placeholder,
            max_len,
        },
    }
}

const BANKS: &[&str] = &["SBI", "HDFC Bank", "ICICI Bank", "Axis Bank", "Kotak"];
const WALLETS: &[&str] = &["Paytm", "PhonePe", "Amazon Pay", "Mobikwik"];

impl PaymentMode {
    pub const ALL: [PaymentMode; 4] = [Self::Upi, Self::Card, Self::NetBanking, Self::Wallets];

    pub fn parse(value: &str) -> SynthResult<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|mode| mode.as_str()).collect();
                SynthError::InvalidArgument(format!(
                    "unknown payment mode '{value}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upi => "UPI",
            Self::Card => "Card",
            Self::NetBanking => "NetBanking",
            Self::Wallets => "Wallets",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Upi => "Pay via UPI",
            Self::Card => "Pay via Card",
            Self::NetBanking => "Net Banking",
            Self::Wallets => "Wallet Payment",
        }
    }

    pub fn fields(self) -> Vec<FormField> {
        match self {
            Self::Upi => vec![input("UPI ID", Some("example@upi"), None)],
            Self::Card => vec![
                input("Name on Card", None, None),
                input("Card Number", Some("4242 4242 4242 4242"), Some(19)),
                input("Expiry", Some("MM/YY"), Some(5)),
                input("CVV", Some("123"), Some(3)),
            ],
            Self::NetBanking => vec![FormField {
                label: "Select Bank",
                kind: FieldKind::Select { options: BANKS },
            }],
            Self::Wallets => vec![FormField {
                label: "Select Wallet",
                kind: FieldKind::Select { options: WALLETS },
            }],
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum CheckoutScreen {
    Closed,
    /// Free-priced plans route to a contact-sales screen.
    Enterprise,
    Modes,
    Form(PaymentMode),
    Processing,
    Success { message: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckoutFlow {
    screen: CheckoutScreen,
    plan: Option<String>,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self {
            screen: CheckoutScreen::Closed,
            plan: None,
        }
    }
}

impl CheckoutFlow {
    pub fn screen(&self) -> &CheckoutScreen {
        &self.screen
    }

    pub fn plan(&self) -> Option<&str> {
        self.plan.as_deref()
    }

    pub fn open(&mut self, plan: &str, amount: u32) {
        if amount == 0 {
            self.screen = CheckoutScreen::Enterprise;
            return;
        }
        self.plan = Some(plan.to_string());
        self.screen = CheckoutScreen::Modes;
        debug!(plan, amount, "checkout opened");
    }

    pub fn choose_mode(&mut self, mode: PaymentMode) -> SynthResult<()> {
        self.expect_screen("choose a payment mode", |s| {
            matches!(s, CheckoutScreen::Modes | CheckoutScreen::Form(_))
        })?;
        self.screen = CheckoutScreen::Form(mode);
        Ok(())
    }

    pub fn back(&mut self) -> SynthResult<()> {
        self.expect_screen("go back", |s| matches!(s, CheckoutScreen::Form(_)))?;
        self.screen = CheckoutScreen::Modes;
        Ok(())
    }

    pub fn submit(&mut self) -> SynthResult<()> {
        self.expect_screen("submit", |s| matches!(s, CheckoutScreen::Form(_)))?;
        self.screen = CheckoutScreen::Processing;
        Ok(())
    }

    /// Finishes processing and returns the confirmation message.
    pub fn complete(&mut self) -> SynthResult<String> {
        self.expect_screen("complete", |s| matches!(s, CheckoutScreen::Processing))?;
        let message = format!(
            "Your subscription for {} is now active.",
            self.plan.as_deref().unwrap_or("your plan")
        );
        self.screen = CheckoutScreen::Success {
            message: message.clone(),
        };
        Ok(message)
    }

    /// Hides the modal. The last opened plan is kept, as the page does.
    pub fn close(&mut self) {
        self.screen = CheckoutScreen::Closed;
    }

    fn expect_screen(&self, action: &str, allowed: impl Fn(&CheckoutScreen) -> bool) -> SynthResult<()> {
        if allowed(&self.screen) {
            Ok(())
        } else {
            Err(SynthError::InvalidArgument(format!(
                "cannot {action} from checkout screen {:?}",
                self.screen
            )))
        }
    }
}

/// Keeps digits only and groups them in fours: `"4242-4242 42"` -> `"4242 4242 42"`.
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}
