//! Field-level validation for the admin editors.
//!
//! Rules mirror the section forms: length bounds counted in characters (the
//! content is Portuguese, so byte lengths would over-count), URL and email
//! shape checks, and a loose phone check. Validation runs entirely locally
//! and blocks the write when any field fails.

use sabor_common::{AboutContent, ContactContent, Dish, HeroContent, SiteSettings};

/// One rejected field with an operator-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

fn check_len(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
    max: usize,
) {
    let chars = value.chars().count();
    if chars < min {
        errors.push(FieldError {
            field,
            message: format!("{label} deve ter pelo menos {min} caracteres."),
        });
    } else if chars > max {
        errors.push(FieldError {
            field,
            message: format!("{label} não pode ter mais de {max} caracteres."),
        });
    }
}

fn looks_like_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(rest) => !rest.is_empty() && !rest.contains(char::is_whitespace),
        // Fragment links like "#menu" are accepted; the site uses them for
        // in-page navigation buttons.
        None => value.starts_with('#') && value.len() > 1,
    }
}

fn check_url(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if !looks_like_url(value) {
        errors.push(FieldError {
            field,
            message: "Por favor, insira uma URL válida.".into(),
        });
    }
}

/// Optional URL fields accept the empty string: clearing the field with no
/// replacement file is an explicit clear, written verbatim.
fn check_optional_url(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    if !value.is_empty() {
        check_url(errors, field, value);
    }
}

fn check_email(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        errors.push(FieldError {
            field,
            message: "Por favor, insira um email válido.".into(),
        });
    }
}

fn check_phone(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    check_len(errors, field, "O telefone", value, 8, 20);
    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '(' | ')' | '+' | '-' | ' ' | '.'))
    {
        errors.push(FieldError {
            field,
            message: "O telefone contém caracteres inválidos.".into(),
        });
    }
}

/// `R$ 45,90` / `R$ 45`, the shape the dish cards render verbatim.
fn check_price(errors: &mut Vec<FieldError>, field: &'static str, value: &str) {
    let valid = value.strip_prefix("R$ ").is_some_and(|amount| {
        let (whole, cents) = match amount.split_once(',') {
            Some((whole, cents)) => (whole, Some(cents)),
            None => (amount, None),
        };
        let whole_ok = !whole.is_empty() && whole.chars().all(|c| c.is_ascii_digit());
        let cents_ok = cents
            .map(|c| c.len() == 2 && c.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(true);
        whole_ok && cents_ok
    });
    if !valid {
        errors.push(FieldError {
            field,
            message: "Preço inválido. Ex: R$ 10,90".into(),
        });
    }
}

pub fn hero(values: &HeroContent) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_len(&mut errors, "title", "O título", &values.title, 5, 100);
    check_len(&mut errors, "subtitle", "O subtítulo", &values.subtitle, 10, 200);
    check_len(&mut errors, "buttonText", "O texto do botão", &values.button_text, 3, 30);
    check_url(&mut errors, "buttonLink", &values.button_link);
    check_optional_url(&mut errors, "backgroundImageUrl", &values.background_image_url);
    errors
}

pub fn about(values: &AboutContent) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_len(&mut errors, "title", "O título", &values.title, 5, 100);
    check_len(
        &mut errors,
        "highlightedWord",
        "A palavra destacada",
        &values.highlighted_word,
        1,
        30,
    );
    check_len(&mut errors, "paragraph1", "O primeiro parágrafo", &values.paragraph1, 10, 300);
    check_len(&mut errors, "paragraph2", "O segundo parágrafo", &values.paragraph2, 10, 300);
    check_len(&mut errors, "buttonText", "O texto do botão", &values.button_text, 3, 30);
    check_len(&mut errors, "buttonLink", "O link do botão", &values.button_link, 1, 200);
    check_optional_url(&mut errors, "imageUrl", &values.image_url);
    errors
}

pub fn contact(values: &ContactContent) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_len(&mut errors, "title", "O título", &values.title, 5, 100);
    check_len(
        &mut errors,
        "highlightedWord",
        "A palavra destacada",
        &values.highlighted_word,
        1,
        30,
    );
    check_len(&mut errors, "description", "A descrição", &values.description, 10, 200);
    check_len(&mut errors, "address", "O endereço", &values.address, 5, 200);
    check_phone(&mut errors, "phone", &values.phone);
    check_email(&mut errors, "email", &values.email);
    check_len(
        &mut errors,
        "scheduleWeekdays",
        "O horário",
        &values.schedule_weekdays,
        3,
        50,
    );
    check_len(
        &mut errors,
        "scheduleWeekends",
        "O horário",
        &values.schedule_weekends,
        3,
        50,
    );
    check_optional_url(&mut errors, "facebookUrl", &values.facebook_url);
    check_optional_url(&mut errors, "instagramUrl", &values.instagram_url);
    errors
}

pub fn site_settings(values: &SiteSettings) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_len(&mut errors, "establishmentName", "O nome", &values.establishment_name, 3, 50);
    errors
}

pub fn dish(values: &Dish) -> Vec<FieldError> {
    let mut errors = Vec::new();
    check_len(&mut errors, "name", "O nome", &values.name, 3, 100);
    check_len(&mut errors, "description", "A descrição", &values.description, 10, 500);
    check_price(&mut errors, "price", &values.price);
    check_url(&mut errors, "imageSrc", &values.image_src);
    errors
}
