//! Checkout flow: the simulated ticket purchase.
//!
//! `Start` loads the event, the form is edited through field actions, and a
//! valid `Submit` moves to `Processing` and schedules `PurchaseCompleted`
//! after the configured purchase latency. No payment is actually taken.

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::error::StorefrontError;
use crate::types::{Event, EventId, Money, Notice, PaymentMethod};
use chrono::{DateTime, Utc};
use eventticket_core::{SmallVec, delay, effect::Effect, environment::Clock, reducer::Reducer, smallvec};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

// ============================================================================
// Form data
// ============================================================================

/// Contact details of the buyer
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaserDetails {
    /// First name (required)
    pub first_name: String,
    /// Last name (required)
    pub last_name: String,
    /// Email address (required)
    pub email: String,
    /// Phone number (optional)
    pub phone: String,
}

/// Payment section of the form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Selected method
    pub method: PaymentMethod,
    /// Card number (required for credit)
    pub card_number: String,
    /// Expiry date (required for credit)
    pub expiry_date: String,
    /// Security code (required for credit)
    pub cvv: String,
    /// Name on card (optional)
    pub card_name: String,
}

/// Editable text fields of the checkout form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutField {
    /// Buyer first name
    FirstName,
    /// Buyer last name
    LastName,
    /// Buyer email
    Email,
    /// Buyer phone
    Phone,
    /// Card number
    CardNumber,
    /// Card expiry
    ExpiryDate,
    /// Card security code
    Cvv,
    /// Name on card
    CardName,
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

impl PurchaserDetails {
    fn validate(&self) -> Result<(), StorefrontError> {
        if is_blank(&self.first_name) || is_blank(&self.last_name) || is_blank(&self.email) {
            return Err(StorefrontError::MissingRequiredFields);
        }
        Ok(())
    }
}

impl PaymentDetails {
    fn validate(&self) -> Result<(), StorefrontError> {
        if self.method.requires_card_details()
            && (is_blank(&self.card_number) || is_blank(&self.expiry_date) || is_blank(&self.cvv))
        {
            return Err(StorefrontError::MissingPaymentDetails);
        }
        Ok(())
    }
}

// ============================================================================
// Pricing
// ============================================================================

/// Price breakdown shown beside the form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Price of one ticket
    pub unit_price: Money,
    /// Number of tickets
    pub quantity: u32,
    /// `unit_price × quantity`
    pub subtotal: Money,
    /// Service fee on the subtotal
    pub service_fee: Money,
    /// `subtotal + service_fee`
    pub total: Money,
}

impl OrderSummary {
    /// Computes the breakdown for `quantity` tickets at `unit_price`
    #[must_use]
    pub const fn compute(unit_price: Money, quantity: u32, service_fee_percent: u32) -> Self {
        let subtotal = unit_price.saturating_multiply(quantity);
        let service_fee = subtotal.percent(service_fee_percent);
        Self {
            unit_price,
            quantity,
            subtotal,
            service_fee,
            total: subtotal.saturating_add(service_fee),
        }
    }
}

/// Proof of a completed purchase
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Confirmation code (e.g. `ET-1A2B3C4D`)
    pub confirmation: String,
    /// Purchased event
    pub event_id: EventId,
    /// Title of the purchased event
    pub event_title: String,
    /// Tickets bought
    pub ticket_count: u32,
    /// Amounts charged
    pub summary: OrderSummary,
    /// Where the confirmation is sent
    pub email: String,
    /// When the purchase completed
    pub purchased_at: DateTime<Utc>,
}

// ============================================================================
// State and actions
// ============================================================================

/// Where the checkout currently is
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutPhase {
    /// Nothing started
    #[default]
    Idle,
    /// The requested event does not exist
    NotFound(EventId),
    /// The requested event has no tickets left
    SoldOut(EventId),
    /// Form is open
    Editing,
    /// Purchase submitted, waiting for completion
    Processing,
    /// Purchase done
    Completed(Receipt),
}

/// State of the checkout page
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutState {
    /// Current phase
    pub phase: CheckoutPhase,
    /// Event being purchased
    pub event: Option<Event>,
    /// Tickets selected
    pub quantity: u32,
    /// Buyer details
    pub purchaser: PurchaserDetails,
    /// Payment details
    pub payment: PaymentDetails,
    /// Current price breakdown
    pub summary: Option<OrderSummary>,
    /// Last validation or lookup failure
    pub last_error: Option<StorefrontError>,
    /// Last message for the user
    pub last_notice: Option<Notice>,
}

impl CheckoutState {
    /// Whether a purchase is in flight
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self.phase, CheckoutPhase::Processing)
    }

    /// The receipt, once the purchase completed
    #[must_use]
    pub const fn receipt(&self) -> Option<&Receipt> {
        match &self.phase {
            CheckoutPhase::Completed(receipt) => Some(receipt),
            _ => None,
        }
    }

    fn field_mut(&mut self, field: CheckoutField) -> &mut String {
        match field {
            CheckoutField::FirstName => &mut self.purchaser.first_name,
            CheckoutField::LastName => &mut self.purchaser.last_name,
            CheckoutField::Email => &mut self.purchaser.email,
            CheckoutField::Phone => &mut self.purchaser.phone,
            CheckoutField::CardNumber => &mut self.payment.card_number,
            CheckoutField::ExpiryDate => &mut self.payment.expiry_date,
            CheckoutField::Cvv => &mut self.payment.cvv,
            CheckoutField::CardName => &mut self.payment.card_name,
        }
    }

    fn fail(&mut self, error: StorefrontError) {
        self.last_notice = Some(Notice::from(&error));
        self.last_error = Some(error);
    }
}

/// Inputs to the checkout flow
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutAction {
    // Commands
    /// Open checkout for an event, usually from the detail page
    Start {
        /// Event to purchase
        event_id: EventId,
        /// Requested ticket count
        quantity: u32,
    },
    /// Quantity stepper changed
    QuantityChanged(u32),
    /// A text field was edited
    FieldChanged {
        /// Which field
        field: CheckoutField,
        /// New value
        value: String,
    },
    /// Payment method switched
    PaymentMethodChanged(PaymentMethod),
    /// "Complete purchase" pressed
    Submit,

    // Feedback
    /// Simulated payment finished
    PurchaseCompleted {
        /// Confirmation code issued at submit
        confirmation: String,
    },
}

// ============================================================================
// Environment and reducer
// ============================================================================

/// Dependencies of the checkout flow
#[derive(Clone)]
pub struct CheckoutEnvironment {
    /// Shared catalog
    pub catalog: Arc<Catalog>,
    /// Clock for receipt timestamps
    pub clock: Arc<dyn Clock>,
    /// Simulated payment latency
    pub purchase_delay: Duration,
    /// Service fee on the subtotal, in percent
    pub service_fee_percent: u32,
}

impl CheckoutEnvironment {
    /// Default service fee in percent
    pub const DEFAULT_SERVICE_FEE_PERCENT: u32 = 5;
    /// Default simulated payment latency
    pub const DEFAULT_PURCHASE_DELAY: Duration = Duration::from_secs(3);

    /// Creates an environment with default latency and fee
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            clock,
            purchase_delay: Self::DEFAULT_PURCHASE_DELAY,
            service_fee_percent: Self::DEFAULT_SERVICE_FEE_PERCENT,
        }
    }

    /// Creates an environment using the latency and fee from `config`
    #[must_use]
    pub fn from_config(catalog: Arc<Catalog>, clock: Arc<dyn Clock>, config: &StorefrontConfig) -> Self {
        Self {
            catalog,
            clock,
            purchase_delay: config.purchase_delay,
            service_fee_percent: config.service_fee_percent,
        }
    }

    /// Overrides the simulated payment latency
    #[must_use]
    pub const fn with_purchase_delay(mut self, delay: Duration) -> Self {
        self.purchase_delay = delay;
        self
    }
}

/// Reducer for the checkout flow
#[derive(Clone, Debug, Default)]
pub struct CheckoutReducer;

impl CheckoutReducer {
    /// Creates a new `CheckoutReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn new_confirmation() -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("ET-{}", id.chars().take(8).collect::<String>().to_uppercase())
    }

    fn start(state: &mut CheckoutState, event_id: EventId, quantity: u32, env: &CheckoutEnvironment) {
        *state = CheckoutState::default();

        let Some(event) = env.catalog.get(event_id.as_str()) else {
            tracing::warn!(event_id = %event_id, "Checkout for unknown event");
            state.fail(StorefrontError::EventNotFound(event_id.clone()));
            state.phase = CheckoutPhase::NotFound(event_id);
            return;
        };

        if event.is_sold_out() {
            tracing::warn!(event_id = %event_id, "Checkout for sold out event");
            state.fail(StorefrontError::SoldOut(event_id.clone()));
            state.phase = CheckoutPhase::SoldOut(event_id);
            return;
        }

        let quantity = quantity.clamp(1, event.available_tickets);
        state.quantity = quantity;
        state.summary = Some(OrderSummary::compute(event.price, quantity, env.service_fee_percent));
        state.event = Some(event.clone());
        state.phase = CheckoutPhase::Editing;
    }
}

impl Reducer for CheckoutReducer {
    type State = CheckoutState;
    type Action = CheckoutAction;
    type Environment = CheckoutEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            CheckoutAction::Start { event_id, quantity } => {
                if state.is_processing() {
                    tracing::debug!("Ignoring Start while a purchase is in flight");
                    return SmallVec::new();
                }
                Self::start(state, event_id, quantity, env);
                SmallVec::new()
            },

            CheckoutAction::QuantityChanged(quantity) => {
                if state.phase != CheckoutPhase::Editing {
                    return SmallVec::new();
                }
                let Some(event) = &state.event else {
                    return SmallVec::new();
                };
                if quantity >= 1 && quantity <= event.available_tickets {
                    state.quantity = quantity;
                    state.summary = Some(OrderSummary::compute(
                        event.price,
                        quantity,
                        env.service_fee_percent,
                    ));
                }
                SmallVec::new()
            },

            CheckoutAction::FieldChanged { field, value } => {
                if state.phase == CheckoutPhase::Editing {
                    *state.field_mut(field) = value;
                }
                SmallVec::new()
            },

            CheckoutAction::PaymentMethodChanged(method) => {
                if state.phase == CheckoutPhase::Editing {
                    state.payment.method = method;
                }
                SmallVec::new()
            },

            CheckoutAction::Submit => {
                if state.phase != CheckoutPhase::Editing {
                    return SmallVec::new();
                }

                let validation = state
                    .purchaser
                    .validate()
                    .and_then(|()| state.payment.validate());
                if let Err(error) = validation {
                    tracing::warn!(error = %error, "Checkout validation failed");
                    state.fail(error);
                    return SmallVec::new();
                }

                state.last_error = None;
                state.last_notice = None;
                state.phase = CheckoutPhase::Processing;

                let confirmation = Self::new_confirmation();
                tracing::debug!(%confirmation, delay = ?env.purchase_delay, "Purchase submitted");

                smallvec![delay! {
                    duration: env.purchase_delay,
                    action: CheckoutAction::PurchaseCompleted { confirmation }
                }]
            },

            // ========== Feedback ==========
            CheckoutAction::PurchaseCompleted { confirmation } => {
                if !state.is_processing() {
                    return SmallVec::new();
                }
                let (Some(event), Some(summary)) = (&state.event, state.summary) else {
                    return SmallVec::new();
                };

                let receipt = Receipt {
                    confirmation,
                    event_id: event.id.clone(),
                    event_title: event.title.clone(),
                    ticket_count: state.quantity,
                    summary,
                    email: state.purchaser.email.clone(),
                    purchased_at: env.clock.now(),
                };

                tracing::info!(
                    confirmation = %receipt.confirmation,
                    event_id = %receipt.event_id,
                    tickets = receipt.ticket_count,
                    total = %receipt.summary.total,
                    "Purchase completed"
                );

                state.last_notice = Some(Notice::success(
                    "Purchase Successful!",
                    "Your tickets have been booked. Check your email for confirmation.",
                ));
                state.phase = CheckoutPhase::Completed(receipt);
                SmallVec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NoticeLevel;
    use eventticket_testing::{ReducerTest, assertions, test_clock};

    fn env() -> CheckoutEnvironment {
        CheckoutEnvironment::new(Arc::new(Catalog::seed()), Arc::new(test_clock()))
    }

    fn start(id: &str, quantity: u32) -> CheckoutAction {
        CheckoutAction::Start {
            event_id: EventId::from(id),
            quantity,
        }
    }

    fn field(field: CheckoutField, value: &str) -> CheckoutAction {
        CheckoutAction::FieldChanged {
            field,
            value: value.to_string(),
        }
    }

    fn filled_in(id: &str, quantity: u32) -> CheckoutState {
        let mut state = CheckoutState::default();
        let env = env();
        let reducer = CheckoutReducer::new();
        for action in [
            start(id, quantity),
            field(CheckoutField::FirstName, "Ada"),
            field(CheckoutField::LastName, "Lovelace"),
            field(CheckoutField::Email, "ada@example.com"),
            field(CheckoutField::CardNumber, "4242 4242 4242 4242"),
            field(CheckoutField::ExpiryDate, "12/30"),
            field(CheckoutField::Cvv, "123"),
        ] {
            let _ = reducer.reduce(&mut state, action, &env);
        }
        state
    }

    #[test]
    fn order_summary_adds_five_percent_fee() {
        let summary = OrderSummary::compute(Money::from_cents(8999), 2, 5);
        assert_eq!(summary.subtotal, Money::from_cents(17_998));
        assert_eq!(summary.service_fee, Money::from_cents(900));
        assert_eq!(summary.total, Money::from_cents(18_898));
    }

    #[test]
    fn start_loads_event_and_summary() {
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(start("4", 2))
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Editing);
                assert_eq!(state.quantity, 2);
                let summary = state.summary.unwrap();
                assert_eq!(summary.subtotal, Money::from_cents(9000));
                assert_eq!(summary.service_fee, Money::from_cents(450));
                assert_eq!(summary.total, Money::from_cents(9450));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn start_unknown_event_is_not_found() {
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(start("404", 1))
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::NotFound(EventId::from("404")));
                assert_eq!(
                    state.last_error,
                    Some(StorefrontError::EventNotFound(EventId::from("404")))
                );
                assert!(state.event.is_none());
            })
            .run();
    }

    #[test]
    fn start_sold_out_event_is_rejected() {
        let mut events = Catalog::seed().events().to_vec();
        events[2].available_tickets = 0;
        let env = CheckoutEnvironment::new(
            Arc::new(Catalog::new(events).unwrap()),
            Arc::new(test_clock()),
        );
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env)
            .given_state(CheckoutState::default())
            .when_action(start("3", 1))
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::SoldOut(EventId::from("3")));
                assert_eq!(state.last_notice.as_ref().unwrap().title, "Sold Out");
            })
            .run();
    }

    #[test]
    fn start_clamps_quantity_to_availability() {
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(start("3", 500))
            .then_state(|state| assert_eq!(state.quantity, 80))
            .run();

        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(start("3", 0))
            .then_state(|state| assert_eq!(state.quantity, 1))
            .run();
    }

    #[test]
    fn quantity_outside_availability_is_ignored() {
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(start("3", 2))
            .when_action(CheckoutAction::QuantityChanged(0))
            .when_action(CheckoutAction::QuantityChanged(81))
            .then_state(|state| assert_eq!(state.quantity, 2))
            .run();

        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(start("3", 2))
            .when_action(CheckoutAction::QuantityChanged(80))
            .then_state(|state| {
                assert_eq!(state.quantity, 80);
                assert_eq!(state.summary.unwrap().subtotal, Money::from_cents(1_199_920));
            })
            .run();
    }

    #[test]
    fn submit_without_contact_details_fails() {
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(CheckoutState::default())
            .when_action(start("1", 1))
            .when_action(field(CheckoutField::FirstName, "Ada"))
            .when_action(CheckoutAction::Submit)
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Editing);
                assert_eq!(state.last_error, Some(StorefrontError::MissingRequiredFields));
                let notice = state.last_notice.as_ref().unwrap();
                assert_eq!(notice.level, NoticeLevel::Error);
                assert_eq!(notice.title, "Missing Information");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn credit_card_requires_card_details() {
        let mut state = filled_in("1", 1);
        state.payment.cvv.clear();
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CheckoutAction::Submit)
            .then_state(|state| {
                assert_eq!(state.last_error, Some(StorefrontError::MissingPaymentDetails));
                assert_eq!(
                    state.last_notice.as_ref().unwrap().title,
                    "Payment Information Required"
                );
            })
            .run();
    }

    #[test]
    fn paypal_skips_card_details() {
        let mut state = filled_in("1", 1);
        state.payment.card_number.clear();
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CheckoutAction::PaymentMethodChanged(PaymentMethod::PayPal))
            .when_action(CheckoutAction::Submit)
            .then_state(|state| assert!(state.is_processing()))
            .then_effects(assertions::assert_has_delay_effect)
            .run();
    }

    #[test]
    fn valid_submit_schedules_completion() {
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(filled_in("2", 3))
            .when_action(CheckoutAction::Submit)
            .then_state(|state| {
                assert_eq!(state.phase, CheckoutPhase::Processing);
                assert!(state.last_error.is_none());
            })
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                let (duration, action) = effects[0].delayed_action().unwrap();
                assert_eq!(*duration, Duration::from_secs(3));
                assert!(matches!(
                    action,
                    CheckoutAction::PurchaseCompleted { confirmation } if confirmation.starts_with("ET-") && confirmation.len() == 11
                ));
            })
            .run();
    }

    #[test]
    fn submit_while_processing_is_ignored() {
        let mut state = filled_in("2", 1);
        state.phase = CheckoutPhase::Processing;
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CheckoutAction::Submit)
            .when_action(field(CheckoutField::Email, "other@example.com"))
            .then_state(|state| {
                assert!(state.is_processing());
                assert_eq!(state.purchaser.email, "ada@example.com");
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn completion_issues_receipt() {
        let mut state = filled_in("5", 4);
        state.phase = CheckoutPhase::Processing;
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(CheckoutAction::PurchaseCompleted {
                confirmation: "ET-TEST0001".into(),
            })
            .then_state(|state| {
                let receipt = state.receipt().unwrap();
                assert_eq!(receipt.confirmation, "ET-TEST0001");
                assert_eq!(receipt.event_title, "Startup Pitch Competition");
                assert_eq!(receipt.ticket_count, 4);
                assert_eq!(receipt.summary.total, Money::from_cents(10_500));
                assert_eq!(receipt.purchased_at, test_clock().now());
                assert_eq!(
                    state.last_notice,
                    Some(Notice::success(
                        "Purchase Successful!",
                        "Your tickets have been booked. Check your email for confirmation."
                    ))
                );
            })
            .run();
    }

    #[test]
    fn stray_completion_is_ignored() {
        ReducerTest::new(CheckoutReducer::new())
            .with_env(env())
            .given_state(filled_in("1", 1))
            .when_action(CheckoutAction::PurchaseCompleted {
                confirmation: "ET-STRAY000".into(),
            })
            .then_state(|state| assert_eq!(state.phase, CheckoutPhase::Editing))
            .run();
    }
}
