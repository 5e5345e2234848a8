use serde::Deserialize;

use runway_core::actions::{Acknowledgement, StageAction};
use runway_core::errors::{ActionError, ValidationError};
use runway_core::payloads::PaymentMethod;
use runway_core::session::WizardSession;
use runway_core::stage::Stage;

/// Keys that would mean raw card data is flowing through the wizard.
/// Card collection belongs to the payment provider, never to this stage.
const FORBIDDEN_CARD_FIELDS: &[&str] = &["cardNumber", "cvv", "cvc", "expiry"];

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ConnectPaymentsRequest {
    #[serde(rename_all = "camelCase")]
    Connected { account_id: String },
    Skip,
}

/// Fifth stage: connect a payments account, or skip and settle manually.
/// Both paths land on review.
pub struct ConnectPaymentsAction;

impl StageAction for ConnectPaymentsAction {
    fn name(&self) -> &str {
        "connectPayments"
    }

    fn stage(&self) -> Stage {
        Stage::PaymentSetup
    }

    fn description(&self) -> &str {
        "Connect a payments account, or skip to settle ticket sales manually"
    }

    fn instructions(&self) -> &str {
        "Offer to connect the organizer's payments account so ticket revenue \
         flows automatically, passing through only the connected account id. \
         Never ask for or accept card numbers, CVV codes, or expiry dates — \
         card entry happens on the payment provider's own pages. The user may \
         skip this step and handle payment manually."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": ["type"],
            "properties": {
                "type": { "type": "string", "enum": ["connected", "skip"] },
                "accountId": {
                    "type": "string",
                    "description": "Opaque id of the connected payments account"
                }
            }
        })
    }

    fn handle(
        &self,
        args: serde_json::Value,
        session: &mut WizardSession,
    ) -> Result<Acknowledgement, ActionError> {
        for field in FORBIDDEN_CARD_FIELDS {
            if args.get(field).is_some() {
                return Err(ValidationError::ForbiddenField(field).into());
            }
        }

        let request: ConnectPaymentsRequest =
            serde_json::from_value(args).map_err(ValidationError::from)?;

        let (method, message) = match request {
            ConnectPaymentsRequest::Connected { account_id } => {
                if account_id.trim().is_empty() {
                    return Err(ValidationError::InvalidValue {
                        field: "accountId",
                        detail: "must not be empty".into(),
                    }
                    .into());
                }
                (
                    PaymentMethod::Connected { account_id },
                    "Payments account connected. Let's review everything.".to_string(),
                )
            }
            ConnectPaymentsRequest::Skip => (
                PaymentMethod::Manual,
                "Skipping payments for now — sales will be settled manually. Let's review everything."
                    .to_string(),
            ),
        };

        session.set_payment_method(method);
        session.set_stage(Stage::ReviewPublish)?;

        Ok(Acknowledgement {
            message,
            stage: session.stage(),
        })
    }
}
