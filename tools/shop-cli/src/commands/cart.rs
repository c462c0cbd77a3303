//! Cart commands.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use serde_json::json;
use shop_commerce::cart::CartStore;
use shop_commerce::ProductId;

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show(ctx),
        CartCommand::Add { product_id, qty } => add(&product_id, qty, ctx).await,
        CartCommand::Remove { product_id } => remove(&product_id, ctx),
        CartCommand::Clear { yes } => clear(yes, ctx),
    }
}

fn show(ctx: &Context) -> Result<()> {
    let cart = ctx.cart()?;
    let totals = cart.totals(&ctx.rules()?)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "cart": cart.snapshot(),
            "itemCount": cart.item_count(),
            "totals": totals,
        }));
        return Ok(());
    }

    ctx.output.header("Shopping Cart");
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    print_items(&cart, ctx)?;
    println!();
    ctx.output.kv("Subtotal", &format!("{} items", cart.item_count()));
    ctx.output.totals(&totals);

    Ok(())
}

/// Print the line items as a table.
pub(crate) fn print_items(cart: &CartStore, ctx: &Context) -> Result<()> {
    let widths = [14, 28, 5, 12, 12];
    ctx.output.table_row(&["ID", "NAME", "QTY", "PRICE", "TOTAL"], &widths);
    for item in cart.items() {
        let qty = format!("{}/{}", item.qty, item.count_in_stock);
        let price = item.price.display();
        let total = item.line_total()?.display();
        ctx.output.table_row(
            &[item.product_id.as_str(), &item.name, &qty, &price, &total],
            &widths,
        );
    }
    Ok(())
}

async fn add(product_id: &str, qty: i64, ctx: &Context) -> Result<()> {
    let api = ctx.api()?;
    let product = api
        .fetch_product(&ProductId::new(product_id))
        .await
        .with_context(|| format!("Failed to look up product {}", product_id))?;
    let name = product.name.clone();

    let cart = ctx.cart()?;
    let stored = cart.add_or_update_item(product, qty)?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "product": product_id, "qty": stored }));
        return Ok(());
    }
    if i64::from(stored) != qty {
        ctx.output.warn(&format!("Quantity adjusted from {} to {}", qty, stored));
    }
    ctx.output.success(&format!("{} x {} in cart", stored, name));
    Ok(())
}

fn remove(product_id: &str, ctx: &Context) -> Result<()> {
    let cart = ctx.cart()?;
    if cart.remove_item(&ProductId::new(product_id)) {
        ctx.output.success(&format!("Removed {}", product_id));
    } else {
        ctx.output.info(&format!("{} is not in the cart", product_id));
    }
    Ok(())
}

fn clear(yes: bool, ctx: &Context) -> Result<()> {
    let cart = ctx.cart()?;
    if !yes && !ctx.output.is_json() && !cart.is_empty() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Remove all {} items from the cart?", cart.len()))
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cart left as is");
            return Ok(());
        }
    }

    cart.clear();
    ctx.output.success("Cart cleared");
    Ok(())
}
