use std::io::{self, Write};

use admin_core::{FormMode, PagerView, ProductForm, MAX_IMAGE_SLOTS};
use shared::domain::Product;

pub fn product_table(out: &mut impl Write, products: &[Product]) -> io::Result<()> {
    writeln!(
        out,
        "{:<22} {:<12} {:<28} {:>10} {:>10}  {}",
        "id", "category", "title", "origin", "price", "enabled"
    )?;
    if products.is_empty() {
        return writeln!(out, "  (no products)");
    }
    for product in products {
        writeln!(
            out,
            "{:<22} {:<12} {:<28} {:>10} {:>10}  {}",
            clip(product.id.as_str(), 22),
            clip(&product.category, 12),
            clip(&product.title, 28),
            product.origin_price,
            product.price,
            if product.is_enabled { "yes" } else { "no" },
        )?;
    }
    Ok(())
}

/// `« [1] 2 3 4 5 »`, with disabled arrows shown as `-`. Nothing for a single page.
pub fn pager_line(out: &mut impl Write, pager: &PagerView) -> io::Result<()> {
    if !pager.visible {
        return Ok(());
    }
    let pages = pager
        .pages
        .iter()
        .map(|link| {
            if link.active {
                format!("[{}]", link.number)
            } else {
                link.number.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(
        out,
        "{} {pages} {}",
        if pager.prev_enabled { "«" } else { "-" },
        if pager.next_enabled { "»" } else { "-" },
    )
}

pub fn product_form(out: &mut impl Write, form: &ProductForm) -> io::Result<()> {
    match form.mode() {
        FormMode::Creating => writeln!(out, "new product")?,
        FormMode::Editing(id) => writeln!(out, "editing product {id}")?,
    }
    let draft = &form.draft;
    writeln!(out, "  imageUrl      {}", draft.image_url)?;
    for (index, url) in draft.images_url.iter().enumerate() {
        writeln!(out, "  image[{index}]      {url}")?;
    }
    writeln!(
        out,
        "  ({} of {MAX_IMAGE_SLOTS} extra image slots)",
        draft.images_url.len()
    )?;
    writeln!(out, "  title         {}", draft.title)?;
    writeln!(out, "  category      {}", draft.category)?;
    writeln!(out, "  unit          {}", draft.unit)?;
    writeln!(out, "  origin_price  {}", draft.origin_price)?;
    writeln!(out, "  price         {}", draft.price)?;
    writeln!(out, "  description   {}", draft.description)?;
    writeln!(out, "  content       {}", draft.content)?;
    writeln!(out, "  is_enabled    {}", draft.is_enabled)
}

pub fn alert(out: &mut impl Write, message: impl std::fmt::Display) -> io::Result<()> {
    writeln!(out, "! {message}")
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut clipped: String = value.chars().take(width.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
