use std::str::FromStr;

use shared::{
    domain::{Product, ProductId},
    protocol::ProductPayload,
};

use crate::error::ValidationError;

pub const MAX_IMAGE_SLOTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(ProductId),
}

/// The in-progress, possibly invalid copy of a product. Prices stay as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub image_url: String,
    pub images_url: Vec<String>,
    pub title: String,
    pub category: String,
    pub unit: String,
    pub origin_price: String,
    pub price: String,
    pub description: String,
    pub content: String,
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    ImageUrl,
    Title,
    Category,
    Unit,
    OriginPrice,
    Price,
    Description,
    Content,
    IsEnabled,
}

impl FromStr for DraftField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "imageUrl" | "image_url" => Self::ImageUrl,
            "title" => Self::Title,
            "category" => Self::Category,
            "unit" => Self::Unit,
            "origin_price" => Self::OriginPrice,
            "price" => Self::Price,
            "description" => Self::Description,
            "content" => Self::Content,
            "is_enabled" => Self::IsEnabled,
            other => return Err(format!("unknown product field '{other}'")),
        })
    }
}

impl ProductDraft {
    pub fn from_product(product: &Product) -> Self {
        Self {
            image_url: product.image_url.clone(),
            images_url: product.images_url.clone(),
            title: product.title.clone(),
            category: product.category.clone(),
            unit: product.unit.clone(),
            origin_price: product.origin_price.to_string(),
            price: product.price.to_string(),
            description: product.description.clone(),
            content: product.content.clone(),
            is_enabled: product.is_enabled,
        }
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        match field {
            DraftField::ImageUrl => self.image_url = value,
            DraftField::Title => self.title = value,
            DraftField::Category => self.category = value,
            DraftField::Unit => self.unit = value,
            DraftField::OriginPrice => self.origin_price = value,
            DraftField::Price => self.price = value,
            DraftField::Description => self.description = value,
            DraftField::Content => self.content = value,
            DraftField::IsEnabled => {
                self.is_enabled = matches!(
                    value.trim().to_ascii_lowercase().as_str(),
                    "1" | "true" | "yes" | "on"
                )
            }
        }
    }

    /// Appends an empty slot; ignored once the list is full.
    pub fn add_image_slot(&mut self) {
        if self.images_url.len() < MAX_IMAGE_SLOTS {
            self.images_url.push(String::new());
        }
    }

    pub fn remove_last_image_slot(&mut self) {
        self.images_url.pop();
    }

    /// Returns false when `index` has no slot.
    pub fn set_image_at(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.images_url.get_mut(index) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Checks fields in a fixed order and builds the request body from the
    /// first passing draft. Blank image slots are dropped.
    pub fn validate(&self) -> Result<ProductPayload, ValidationError> {
        require(&self.image_url, ValidationError::MissingImageUrl)?;
        require(&self.title, ValidationError::MissingTitle)?;
        require(&self.category, ValidationError::MissingCategory)?;
        require(&self.unit, ValidationError::MissingUnit)?;
        let origin_price = positive_price(
            &self.origin_price,
            ValidationError::MissingOriginPrice,
            ValidationError::InvalidOriginPrice,
        )?;
        let price = positive_price(
            &self.price,
            ValidationError::MissingPrice,
            ValidationError::InvalidPrice,
        )?;

        Ok(ProductPayload {
            image_url: self.image_url.clone(),
            images_url: self
                .images_url
                .iter()
                .filter(|url| !url.trim().is_empty())
                .cloned()
                .collect(),
            title: self.title.clone(),
            category: self.category.clone(),
            unit: self.unit.clone(),
            origin_price,
            price,
            description: self.description.clone(),
            content: self.content.clone(),
            is_enabled: self.is_enabled,
        })
    }
}

fn require(value: &str, missing: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(missing);
    }
    Ok(())
}

fn positive_price(
    raw: &str,
    missing: ValidationError,
    invalid: ValidationError,
) -> Result<f64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(missing);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(value),
        _ => Err(invalid),
    }
}

/// Create/edit form state. `open` mirrors whether the modal is on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    mode: FormMode,
    pub draft: ProductDraft,
    open: bool,
}

impl ProductForm {
    pub fn creating() -> Self {
        Self {
            mode: FormMode::Creating,
            draft: ProductDraft::default(),
            open: true,
        }
    }

    pub fn editing(product: &Product) -> Self {
        Self {
            mode: FormMode::Editing(product.id.clone()),
            draft: ProductDraft::from_product(product),
            open: true,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn set_open(&mut self, open: bool) {
        self.open = open;
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
