//! Rule-based packaging suggestion: keyword classification of the product
//! description, a family → packaging-type table, representative item sizes
//! for merchants who don't know their dimensions, and the box margin.

use crate::domain::model::{Dimensions, Fragility, ProductFamily};
use serde::Serialize;

/// Ordered: the first family with a matching keyword wins, so a description
/// hitting two lists ("capa de caderno em tecido") resolves to the earlier row.
pub const FAMILY_KEYWORDS: &[(ProductFamily, &[&str])] = &[
    (
        ProductFamily::Textile,
        &[
            "camiseta", "camisa", "blusa", "calça", "calca", "vestido", "roupa", "moletom",
            "bermuda", "saia", "jaqueta", "tecido", "toalha", "lençol", "lencol", "pijama",
        ],
    ),
    (
        ProductFamily::BookPaper,
        &[
            "livro", "caderno", "agenda", "apostila", "revista", "papel", "papelaria", "planner",
            "bloco", "envelope", "cartão", "cartao",
        ],
    ),
    (
        ProductFamily::GlassCeramic,
        &[
            "vidro", "porcelana", "cerâmica", "ceramica", "caneca", "taça", "taca", "copo",
            "prato", "xícara", "xicara", "espelho", "vaso",
        ],
    ),
    (
        ProductFamily::LightElectronics,
        &[
            "fone", "carregador", "cabo usb", "mouse", "teclado", "celular", "smartphone",
            "eletrônico", "eletronico", "controle", "caixa de som", "smartwatch",
        ],
    ),
    (
        ProductFamily::Cosmetics,
        &[
            "perfume", "batom", "creme", "shampoo", "maquiagem", "cosmético", "cosmetico",
            "esmalte", "hidratante", "sabonete", "sérum", "serum",
        ],
    ),
    (
        ProductFamily::JewelryAccessories,
        &[
            "anel", "colar", "brinco", "pulseira", "relógio", "relogio", "bijuteria", "joia",
            "óculos", "oculos", "chaveiro",
        ],
    ),
];

pub const GENERIC_DIMENSIONS: (f64, f64, f64) = (20.0, 15.0, 10.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PackagingKind {
    Envelope,
    Box,
}

impl PackagingKind {
    /// Any label mentioning an envelope is envelope-type; everything else is a box.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("envelope") {
            PackagingKind::Envelope
        } else {
            PackagingKind::Box
        }
    }
}

/// What the rules suggest before the recommendation service is asked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeuristicSuggestion {
    pub family: ProductFamily,
    pub packaging_type: &'static str,
    pub item_dimensions: Dimensions,
    pub box_dimensions: Dimensions,
    pub dimensions_estimated: bool,
}

pub fn classify(description: &str) -> ProductFamily {
    let text = description.to_lowercase();
    FAMILY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(family, _)| *family)
        .unwrap_or(ProductFamily::Other)
}

pub fn packaging_type_for(family: ProductFamily) -> &'static str {
    match family {
        ProductFamily::Textile => "envelope de segurança (plástico coextrusado)",
        ProductFamily::BookPaper => "caixa de papelão fina (tipo livro)",
        ProductFamily::GlassCeramic => "caixa de papelão + proteção interna (múltiplas camadas)",
        ProductFamily::LightElectronics => "caixa de papelão + plástico bolha",
        ProductFamily::Cosmetics => "caixa de papelão + saco vedado antivazamento",
        ProductFamily::JewelryAccessories => "caixa pequena de papelão rígido",
        ProductFamily::Other => "caixa de papelão padrão",
    }
}

/// Packaging type label for a description.
///
/// `fragility` and `quantity` are part of the contract but do not change the
/// label yet; the table is keyed on the product family alone.
pub fn route(description: &str, fragility: Option<Fragility>, quantity: u32) -> &'static str {
    let family = classify(description);
    let label = packaging_type_for(family);
    tracing::debug!(
        "Routed '{}' (family={}, fragility={:?}, quantity={}) -> {}",
        description,
        family.as_str(),
        fragility,
        quantity,
        label
    );
    label
}

/// Representative item size for merchants who don't know their dimensions.
///
/// Textiles honour a clothing size hint (P/M/G/GG or S/M/L/XL); other families
/// ignore it.
pub fn estimate_dimensions(
    description: &str,
    family: ProductFamily,
    size_hint: Option<&str>,
) -> Dimensions {
    let (l, w, h) = match family {
        ProductFamily::Textile => textile_dimensions(size_hint),
        ProductFamily::BookPaper => (22.0, 16.0, 4.0),
        ProductFamily::GlassCeramic => (12.0, 12.0, 10.0),
        ProductFamily::LightElectronics => (18.0, 12.0, 6.0),
        ProductFamily::Cosmetics => (15.0, 8.0, 8.0),
        ProductFamily::JewelryAccessories => (10.0, 8.0, 4.0),
        ProductFamily::Other => GENERIC_DIMENSIONS,
    };
    tracing::debug!(
        "Estimated {}x{}x{} for '{}' ({})",
        l,
        w,
        h,
        description,
        family.as_str()
    );
    Dimensions {
        length: l,
        width: w,
        height: h,
    }
}

fn textile_dimensions(size_hint: Option<&str>) -> (f64, f64, f64) {
    let size = size_hint.map(|s| s.trim().to_uppercase());
    match size.as_deref() {
        Some("PP") | Some("XS") | Some("P") | Some("S") => (28.0, 20.0, 3.0),
        Some("G") | Some("L") => (34.0, 26.0, 5.0),
        Some("GG") | Some("XL") | Some("XG") | Some("XXL") => (38.0, 28.0, 6.0),
        _ => (30.0, 22.0, 4.0),
    }
}

/// Adds wall/cushioning thickness: +1 cm of height for envelopes, +2 cm on
/// every side for boxes.
pub fn expand_for_packaging(dimensions: Dimensions, packaging_type: &str) -> Dimensions {
    match PackagingKind::from_label(packaging_type) {
        PackagingKind::Envelope => Dimensions {
            height: dimensions.height + 1.0,
            ..dimensions
        },
        PackagingKind::Box => Dimensions {
            length: dimensions.length + 2.0,
            width: dimensions.width + 2.0,
            height: dimensions.height + 2.0,
        },
    }
}

/// Runs the whole rule chain for one submission.
pub fn suggest(
    description: &str,
    fragility: Option<Fragility>,
    quantity: u32,
    known_dimensions: Option<Dimensions>,
    size_hint: Option<&str>,
) -> HeuristicSuggestion {
    let family = classify(description);
    let packaging_type = route(description, fragility, quantity);
    let dimensions_estimated = known_dimensions.is_none();
    let item_dimensions = known_dimensions
        .unwrap_or_else(|| estimate_dimensions(description, family, size_hint));
    let box_dimensions = expand_for_packaging(item_dimensions, packaging_type);

    HeuristicSuggestion {
        family,
        packaging_type,
        item_dimensions,
        box_dimensions,
        dimensions_estimated,
    }
}
