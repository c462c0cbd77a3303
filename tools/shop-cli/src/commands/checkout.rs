//! Checkout commands.
//!
//! Each command runs the guard of the page it stands for, so skipping a
//! step prints where to go instead of doing anything.

use anyhow::Result;
use dialoguer::Confirm;
use serde_json::json;
use shop_commerce::checkout::{
    CheckoutController, CheckoutStep, OrderSubmission, PaymentMethod, PlaceOrderOutcome,
    ShippingAddress, Transition,
};

use super::{CheckoutArgs, CheckoutCommand};
use crate::commands::cart::print_items;
use crate::context::Context;
use crate::output::progress_line;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let checkout = ctx.checkout()?;
    match args.command {
        CheckoutCommand::Shipping {
            address,
            city,
            postal_code,
            country,
        } => {
            let form = [address, city, postal_code, country];
            let address = form.iter().any(Option::is_some).then(|| {
                let [address, city, postal_code, country] =
                    form.map(Option::unwrap_or_default);
                ShippingAddress::new(address, city, postal_code, country)
            });
            shipping(address, &checkout, ctx).await
        }
        CheckoutCommand::Payment { method } => payment(method, &checkout, ctx),
        CheckoutCommand::Review => review(&checkout, ctx),
        CheckoutCommand::Place { yes } => place(yes, &checkout, ctx).await,
    }
}

/// Print a guard result; returns whether the shopper may continue.
fn report(transition: &Transition, ctx: &Context) -> bool {
    if ctx.output.is_json() {
        ctx.output.json(transition);
    } else {
        ctx.output.redirect(transition);
    }
    transition.is_allowed()
}

async fn shipping(
    address: Option<ShippingAddress>,
    checkout: &CheckoutController,
    ctx: &Context,
) -> Result<()> {
    let entered = checkout.proceed_to_shipping().await;
    if !entered.is_allowed() {
        report(&entered, ctx);
        return Ok(());
    }

    let Some(address) = address else {
        let saved = checkout.cart().shipping_address();
        if ctx.output.is_json() {
            ctx.output.json(&saved);
        } else if saved.is_empty() {
            ctx.output.info("No shipping address yet");
        } else {
            ctx.output.kv("Shipping to", &saved.one_line());
            if !saved.is_complete() {
                ctx.output.warn(&format!("Missing: {}", saved.missing_fields().join(", ")));
            }
        }
        return Ok(());
    };

    let missing = address.missing_fields();
    let transition = checkout.submit_shipping(address);
    if !transition.is_allowed() && !missing.is_empty() && !ctx.output.is_json() {
        ctx.output.warn(&format!("Missing: {}", missing.join(", ")));
    }
    if report(&transition, ctx) {
        ctx.output.success("Shipping address saved");
        ctx.output.info(&progress_line(checkout.current_step()));
    }
    Ok(())
}

fn payment(method: String, checkout: &CheckoutController, ctx: &Context) -> Result<()> {
    if !report(&checkout.enter_payment(), ctx) {
        return Ok(());
    }

    let method = PaymentMethod::from(method);
    let label = method.display_name().to_string();
    if report(&checkout.submit_payment(method), ctx) {
        ctx.output.success(&format!("Paying by {}", label));
        ctx.output.info(&progress_line(checkout.current_step()));
    }
    Ok(())
}

fn review(checkout: &CheckoutController, ctx: &Context) -> Result<()> {
    let transition = checkout.enter_review();
    if !transition.is_allowed() {
        report(&transition, ctx);
        return Ok(());
    }

    let cart = checkout.cart();
    if ctx.output.is_json() {
        ctx.output.json(&OrderSubmission::from_cart(&cart.snapshot(), checkout.rules())?);
        return Ok(());
    }

    ctx.output.info(&progress_line(checkout.current_step()));
    ctx.output.header("Shipping");
    ctx.output.kv("Address", &cart.shipping_address().one_line());
    ctx.output.header("Payment Method");
    ctx.output.kv("Method", cart.payment_method().display_name());
    ctx.output.header("Order Items");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }
    print_items(cart, ctx)?;
    ctx.output.header("Order Summary");
    ctx.output.totals(&cart.totals(checkout.rules())?);
    Ok(())
}

async fn place(yes: bool, checkout: &CheckoutController, ctx: &Context) -> Result<()> {
    if !yes && !ctx.output.is_json() {
        let guard = checkout.enter_review();
        if !report(&guard, ctx) {
            return Ok(());
        }
        if checkout.cart().is_empty() {
            ctx.output.redirect(&Transition::Redirect {
                step: CheckoutStep::Cart,
            });
            return Ok(());
        }
        let totals = checkout.cart().totals(checkout.rules())?;
        let confirmed = Confirm::new()
            .with_prompt(format!("Place order for {}?", totals.total_price.display()))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Order not placed");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Placing order...");
    let result = checkout.place_order().await;
    spinner.finish_and_clear();

    match result? {
        PlaceOrderOutcome::Placed(order_id) => {
            let path = checkout.order_path().unwrap_or_default();
            if ctx.output.is_json() {
                ctx.output.json(&json!({ "orderId": order_id, "path": path }));
            } else {
                ctx.output.success(&format!("Order {} placed", order_id));
                ctx.output.kv("Order page", &path);
            }
        }
        PlaceOrderOutcome::Redirected(transition) => {
            report(&transition, ctx);
        }
    }
    Ok(())
}
