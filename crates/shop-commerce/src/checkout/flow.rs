//! Checkout flow state machine.
//!
//! The controller walks `Cart -> Shipping -> Payment -> Review -> Submitted`.
//! Each entry point runs a guard and returns a [`Transition`] describing where
//! the shopper should end up; it never navigates itself.

use crate::cart::{CartStore, PricingRules};
use crate::checkout::{OrderSubmission, OrderSubmitter, PaymentMethod, ShippingAddress};
use crate::ids::OrderId;
use crate::CommerceError;
use serde::{Deserialize, Serialize};
use shop_auth::SessionLookup;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    /// Cart review.
    #[default]
    Cart,
    /// Shipping address form.
    Shipping,
    /// Payment method selection.
    Payment,
    /// Order review before submission.
    Review,
    /// Order created.
    Submitted,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
            CheckoutStep::Submitted => "submitted",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart",
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Place Order",
            CheckoutStep::Submitted => "Order",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Cart => 1,
            CheckoutStep::Shipping => 2,
            CheckoutStep::Payment => 3,
            CheckoutStep::Review => 4,
            CheckoutStep::Submitted => 5,
        }
    }

    /// Storefront route for the step. The submitted order's own page is
    /// `/order/{id}`, see [`CheckoutController::order_path`].
    pub fn path(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "/cart",
            CheckoutStep::Shipping => "/shipping",
            CheckoutStep::Payment => "/payment",
            CheckoutStep::Review => "/placeorder",
            CheckoutStep::Submitted => "/order",
        }
    }

    /// The step before this one.
    pub fn previous(&self) -> CheckoutStep {
        match self {
            CheckoutStep::Cart | CheckoutStep::Shipping => CheckoutStep::Cart,
            CheckoutStep::Payment => CheckoutStep::Shipping,
            CheckoutStep::Review => CheckoutStep::Payment,
            CheckoutStep::Submitted => CheckoutStep::Submitted,
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Result of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// The requested step may be shown.
    Allowed { step: CheckoutStep },
    /// A precondition is unmet; show this earlier step instead.
    Redirect { step: CheckoutStep },
    /// Sign-in is required; come back to `return_to` afterwards.
    Login { return_to: CheckoutStep },
}

impl Transition {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Transition::Allowed { .. })
    }

    /// Where the shopper ends up, `None` while they still have to sign in.
    pub fn step(&self) -> Option<CheckoutStep> {
        match self {
            Transition::Allowed { step } | Transition::Redirect { step } => Some(*step),
            Transition::Login { .. } => None,
        }
    }

    /// Route to send the shopper to, e.g. `/login?redirect=/shipping`.
    pub fn location(&self) -> String {
        match self {
            Transition::Allowed { step } | Transition::Redirect { step } => step.path().to_string(),
            Transition::Login { return_to } => format!("/login?redirect={}", return_to.path()),
        }
    }
}

/// Outcome of [`CheckoutController::place_order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOrderOutcome {
    /// The order was created and the cart cleared.
    Placed(OrderId),
    /// A guard failed before anything was submitted.
    Redirected(Transition),
}

#[derive(Debug, Default)]
struct FlowState {
    step: CheckoutStep,
    last_error: Option<String>,
    placed_order: Option<OrderId>,
}

/// Drives the checkout for one cart.
///
/// All methods take `&self`, so two submit events can race on a shared
/// controller; the in-flight flag lets only one through.
pub struct CheckoutController {
    cart: Arc<CartStore>,
    sessions: Arc<dyn SessionLookup>,
    orders: Arc<dyn OrderSubmitter>,
    rules: PricingRules,
    flow: Mutex<FlowState>,
    in_flight: AtomicBool,
}

impl CheckoutController {
    /// Create a controller starting on the cart step with the standard
    /// pricing rules in the cart's currency.
    pub fn new(
        cart: Arc<CartStore>,
        sessions: Arc<dyn SessionLookup>,
        orders: Arc<dyn OrderSubmitter>,
    ) -> Self {
        let rules = PricingRules::for_currency(cart.currency());
        Self {
            cart,
            sessions,
            orders,
            rules,
            flow: Mutex::new(FlowState::default()),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Use different pricing rules.
    pub fn with_rules(mut self, rules: PricingRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn cart(&self) -> &Arc<CartStore> {
        &self.cart
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    /// The step the shopper is on.
    pub fn current_step(&self) -> CheckoutStep {
        self.flow().step
    }

    /// Message from the last failed submission.
    pub fn last_error(&self) -> Option<String> {
        self.flow().last_error.clone()
    }

    /// Id of the order created by the last successful submission.
    pub fn placed_order(&self) -> Option<OrderId> {
        self.flow().placed_order.clone()
    }

    /// Route of the placed order's page.
    pub fn order_path(&self) -> Option<String> {
        self.placed_order().map(|id| format!("/order/{id}"))
    }

    /// Check if a submission is running.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// "Proceed to checkout" from the cart page.
    ///
    /// Stays on the cart when it is empty and asks for sign-in when there is
    /// no active session. A failing session lookup counts as signed out.
    pub async fn proceed_to_shipping(&self) -> Transition {
        if self.cart.is_empty() {
            return self.land(Transition::Redirect {
                step: CheckoutStep::Cart,
            });
        }
        if self.sessions.active_session().await.is_none() {
            return self.land(Transition::Login {
                return_to: CheckoutStep::Shipping,
            });
        }
        self.land(Transition::Allowed {
            step: CheckoutStep::Shipping,
        })
    }

    /// Enter the payment step; needs a complete shipping address.
    pub fn enter_payment(&self) -> Transition {
        let transition = match self.shipping_guard() {
            Some(redirect) => redirect,
            None => Transition::Allowed {
                step: CheckoutStep::Payment,
            },
        };
        self.land(transition)
    }

    /// Submit the shipping form. An incomplete address is not stored.
    pub fn submit_shipping(&self, address: ShippingAddress) -> Transition {
        if !address.is_complete() {
            debug!(missing = ?address.missing_fields(), "shipping form incomplete");
            return self.land(Transition::Redirect {
                step: CheckoutStep::Shipping,
            });
        }
        self.cart.set_shipping_address(address);
        self.enter_payment()
    }

    /// Enter the review step; needs a complete address, then a payment
    /// method.
    pub fn enter_review(&self) -> Transition {
        let transition = self
            .shipping_guard()
            .or_else(|| self.payment_guard())
            .unwrap_or(Transition::Allowed {
                step: CheckoutStep::Review,
            });
        self.land(transition)
    }

    /// Submit the payment form. A blank method is not stored.
    pub fn submit_payment(&self, method: PaymentMethod) -> Transition {
        if !method.is_selected() {
            return self.land(Transition::Redirect {
                step: CheckoutStep::Payment,
            });
        }
        self.cart.set_payment_method(method);
        self.enter_review()
    }

    /// Step back one page. Returns the new step.
    pub fn go_back(&self) -> CheckoutStep {
        let mut flow = self.flow();
        flow.step = flow.step.previous();
        flow.step
    }

    /// Start over from the cart step.
    pub fn reset(&self) {
        *self.flow() = FlowState::default();
    }

    /// Submit the order built from the current cart.
    ///
    /// On success the cart is cleared and the flow moves to `Submitted`. On
    /// failure the cart is untouched, the flow stays on `Review` and the
    /// order service's message is returned as
    /// [`CommerceError::SubmissionFailed`]. A call made while another is in
    /// flight returns [`CommerceError::SubmissionInFlight`] without reaching
    /// the order service.
    pub async fn place_order(&self) -> Result<PlaceOrderOutcome, CommerceError> {
        let Some(_in_flight) = InFlight::claim(&self.in_flight) else {
            warn!("order submission already in flight");
            return Err(CommerceError::SubmissionInFlight);
        };

        if self.cart.is_empty() {
            return Ok(PlaceOrderOutcome::Redirected(self.land(Transition::Redirect {
                step: CheckoutStep::Cart,
            })));
        }
        let guard = self.enter_review();
        if !guard.is_allowed() {
            return Ok(PlaceOrderOutcome::Redirected(guard));
        }

        let order = OrderSubmission::from_cart(&self.cart.snapshot(), &self.rules)?;
        debug!(
            items = order.order_items.len(),
            total = %order.total_price,
            "submitting order"
        );

        match self.orders.submit_order(&order).await {
            Ok(placed) => {
                self.cart.clear();
                let mut flow = self.flow();
                flow.step = CheckoutStep::Submitted;
                flow.last_error = None;
                flow.placed_order = Some(placed.id.clone());
                info!(order_id = %placed.id, total = %order.total_price, "order placed");
                Ok(PlaceOrderOutcome::Placed(placed.id))
            }
            Err(e) => {
                warn!(error = %e, "order submission rejected");
                let mut flow = self.flow();
                flow.step = CheckoutStep::Review;
                flow.last_error = Some(e.message.clone());
                Err(CommerceError::SubmissionFailed(e.message))
            }
        }
    }

    fn shipping_guard(&self) -> Option<Transition> {
        (!self.cart.shipping_address().is_complete()).then_some(Transition::Redirect {
            step: CheckoutStep::Shipping,
        })
    }

    fn payment_guard(&self) -> Option<Transition> {
        (!self.cart.payment_method().is_selected()).then_some(Transition::Redirect {
            step: CheckoutStep::Payment,
        })
    }

    /// Record where a transition leaves the shopper.
    fn land(&self, transition: Transition) -> Transition {
        if let Some(step) = transition.step() {
            self.flow().step = step;
        }
        debug!(?transition, "checkout transition");
        transition
    }

    fn flow(&self) -> MutexGuard<'_, FlowState> {
        self.flow.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CheckoutController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutController")
            .field("cart", &self.cart)
            .field("rules", &self.rules)
            .field("step", &self.current_step())
            .field("submitting", &self.is_submitting())
            .finish_non_exhaustive()
    }
}

/// Holds the in-flight flag; releases it on drop.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn claim(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
