//! Fixed option lists offered when describing a startup.
//!
//! The lists drive form pickers only. Stored startups keep free text, so
//! values outside these lists are accepted.

use serde::Serialize;
use utoipa::ToSchema;

/// A selectable option: what the picker shows and what gets stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CatalogueOption {
    #[schema(value_type = String)]
    pub label: &'static str,
    #[schema(value_type = String)]
    pub value: &'static str,
}

const fn opt(label: &'static str, value: &'static str) -> CatalogueOption {
    CatalogueOption { label, value }
}

const fn same(value: &'static str) -> CatalogueOption {
    CatalogueOption {
        label: value,
        value,
    }
}

/// Industry sectors.
pub const SECTORS: &[CatalogueOption] = &[
    same("Fintech"),
    same("Healthtech"),
    same("Edtech"),
    same("Agritech"),
    same("E-commerce"),
    same("AI/ML"),
    same("SaaS"),
    same("CleanTech"),
    opt("Web3 / Crypto", "Web3"),
    same("DeepTech"),
    same("Creative Tech"),
    opt("Logistics / Supply Chain", "Logistics"),
    opt("Proptech / Real Estate", "Proptech"),
    same("Cybersecurity"),
    opt("Gaming / Entertainment", "Gaming"),
    same("HRTech"),
    opt("Mobility / Transport", "Mobility"),
    same("RetailTech"),
    same("FoodTech"),
    same("Insurtech"),
    same("Biotech"),
    same("GovTech"),
    opt("MarTech / AdTech", "MarTech"),
    same("Other"),
];

/// Funding stages, stored in the startup's `category` field.
pub const CATEGORIES: &[CatalogueOption] = &[
    same("Pre-seed"),
    same("Seed"),
    same("Series A"),
    same("Series B"),
    same("Series C+"),
    same("Growth"),
];

/// Countries grouped loosely by region.
pub const COUNTRIES: &[CatalogueOption] = &[
    // Europe
    same("France"),
    same("Spain"),
    same("Germany"),
    opt("United Kingdom", "UK"),
    same("Belgium"),
    same("Switzerland"),
    same("Italy"),
    same("Netherlands"),
    same("Greece"),
    same("Austria"),
    same("Hungary"),
    same("Ireland"),
    same("Finland"),
    same("Sweden"),
    same("Cyprus"),
    // Africa
    same("Morocco"),
    same("Tunisia"),
    same("Egypt"),
    same("Algeria"),
    same("Mauritania"),
    same("Ivory Coast"),
    same("Gabon"),
    same("Senegal"),
    same("Mali"),
    same("Congo (DRC)"),
    same("Madagascar"),
    same("Niger"),
    same("Benin"),
    same("Cameroon"),
    same("Ethiopia"),
    same("Guinea"),
    same("Liberia"),
    same("South Africa"),
    same("Ghana"),
    opt("Central African Republic", "CAR"),
    same("Botswana"),
    same("Kenya"),
    same("Nigeria"),
    same("Sierra Leone"),
    // Americas
    opt("United States", "USA"),
    same("Canada"),
    same("Guadeloupe"),
    same("Martinique"),
    same("French Guiana"),
    same("Saint Barthelemy"),
    same("Saint Martin"),
    same("Dominica"),
    same("Bolivia"),
    same("Chile"),
    same("Honduras"),
    same("Mexico"),
    // Middle East
    same("Saudi Arabia"),
    opt("United Arab Emirates", "UAE"),
    same("Bahrain"),
    same("Jordan"),
    same("Kuwait"),
    same("Turkey"),
    // Rest of Europe
    same("Poland"),
    same("Romania"),
    same("Russia"),
    same("Albania"),
    same("Armenia"),
    same("Croatia"),
    same("Malta"),
    // Asia & islands
    same("Mauritius"),
    same("Maldives"),
    same("Philippines"),
    same("Vietnam"),
    same("Other"),
];

/// All pickers bundled for a single response.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogueOptions {
    #[schema(value_type = Vec<CatalogueOption>)]
    pub sectors: &'static [CatalogueOption],
    #[schema(value_type = Vec<CatalogueOption>)]
    pub categories: &'static [CatalogueOption],
    #[schema(value_type = Vec<CatalogueOption>)]
    pub countries: &'static [CatalogueOption],
}

impl CatalogueOptions {
    /// The full option set.
    pub fn all() -> Self {
        Self {
            sectors: SECTORS,
            categories: CATEGORIES,
            countries: COUNTRIES,
        }
    }
}
