use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Collection holding the single-document page sections (`hero`, `about`, ...).
pub const CONTENT_COLLECTION: &str = "content";

/// Collection holding the featured-dish items, one document per dish.
pub const DISHES_COLLECTION: &str = "featuredDishes";

/// A page section whose content lives in one named document.
///
/// `Default` must produce the *empty* value set: a field missing from an old
/// stored document falls through to empty, never to the seed value. The
/// compiled-in defaults rendered while the document is absent come from
/// [`ContentSection::seed`] instead.
pub trait ContentSection:
    Serialize + DeserializeOwned + Default + Clone + PartialEq + Send + Sync + 'static
{
    /// Document id of this section inside [`CONTENT_COLLECTION`].
    const KEY: &'static str;

    /// The compiled-in default value set for this section.
    fn seed() -> Self;
}

/// Landing-page hero banner.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeroContent {
    pub title: String,
    pub subtitle: String,
    pub button_text: String,
    pub button_link: String,
    /// Empty string means "no background image".
    pub background_image_url: String,
}

impl ContentSection for HeroContent {
    const KEY: &'static str = "hero";

    fn seed() -> Self {
        Self {
            title: "O Verdadeiro Sabor da Rua, no Conforto da Sua Casa!".into(),
            subtitle: "Descubra pratos autênticos e cheios de sabor, preparados com \
                       ingredientes frescos e paixão. Perfeito para seu delivery ou uma \
                       noite especial em nosso restaurante."
                .into(),
            button_text: "Peça Agora Online".into(),
            button_link: "#menu".into(),
            background_image_url:
                "https://images.unsplash.com/photo-1504674900247-0877df9cc836?q=80&w=2070&auto=format&fit=crop"
                    .into(),
        }
    }
}

/// "About us" section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AboutContent {
    pub title: String,
    pub highlighted_word: String,
    pub paragraph1: String,
    pub paragraph2: String,
    pub button_text: String,
    pub button_link: String,
    /// Empty string means "no image".
    pub image_url: String,
}

impl ContentSection for AboutContent {
    const KEY: &'static str = "about";

    fn seed() -> Self {
        Self {
            title: "Nossa História, Seu".into(),
            highlighted_word: "Sabor".into(),
            paragraph1: "No Sabor da Rua, acreditamos que comida de verdade tem o poder de \
                         conectar pessoas e criar memórias. Nascemos da paixão pela culinária \
                         de rua autêntica, trazendo pratos clássicos e inovações deliciosas \
                         para sua mesa."
                .into(),
            paragraph2: "Utilizamos ingredientes frescos, selecionados com carinho, e \
                         preparamos cada prato com a dedicação que você merece. Seja para um \
                         delivery rápido ou uma reserva especial, estamos prontos para te \
                         servir o melhor do sabor da rua."
                .into(),
            button_text: "Conheça Nosso Cardápio".into(),
            button_link: "#menu".into(),
            image_url:
                "https://images.unsplash.com/photo-1555396273-367ea4eb4db5?q=80&w=1974&auto=format&fit=crop"
                    .into(),
        }
    }
}

/// Contact section, including the schedule block and social links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactContent {
    pub title: String,
    pub highlighted_word: String,
    pub description: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub schedule_weekdays: String,
    pub schedule_weekends: String,
    /// Empty string means "no link".
    pub facebook_url: String,
    pub instagram_url: String,
}

impl ContentSection for ContactContent {
    const KEY: &'static str = "contact";

    fn seed() -> Self {
        Self {
            title: "Entre em".into(),
            highlighted_word: "Contato".into(),
            description: "Tem alguma dúvida, sugestão ou quer fazer uma reserva? Fale conosco!"
                .into(),
            address: "Rua Fictícia das Delícias, 123\nBairro Saboroso, Cidade Exemplo - CE".into(),
            phone: "(85) 91234-5678".into(),
            email: "contato@sabordarua.com.br".into(),
            schedule_weekdays: "11:00 - 23:00".into(),
            schedule_weekends: "12:00 - 00:00".into(),
            facebook_url: String::new(),
            instagram_url: String::new(),
        }
    }
}

/// Site-wide settings: establishment name and the active color theme.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub establishment_name: String,
    /// Name of a [`crate::themes::THEMES`] catalog entry. `None` (or a name
    /// no longer in the catalog) means the default theme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_theme_name: Option<String>,
}

impl ContentSection for SiteSettings {
    const KEY: &'static str = "siteSettings";

    fn seed() -> Self {
        Self {
            establishment_name: "Sabor da Rua".into(),
            active_theme_name: Some(crate::themes::default_theme().name.to_string()),
        }
    }
}

/// One featured dish. Stored as an individual document in
/// [`DISHES_COLLECTION`] rather than as a field of a section document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dish {
    pub name: String,
    pub description: String,
    /// Formatted currency string, e.g. `R$ 45,90`.
    pub price: String,
    pub image_src: String,
}

impl Dish {
    /// Dishes shown while the remote collection is empty or unreachable.
    pub fn seed_list() -> Vec<Dish> {
        vec![
            Dish {
                name: "Pizza Artesanal da Casa".into(),
                description: "Massa fermentada lentamente, molho de tomate caseiro, mussarela \
                              de primeira e seus ingredientes favoritos."
                    .into(),
                price: "R$ 45,90".into(),
                image_src:
                    "https://images.unsplash.com/photo-1565299624946-b28f40a0ae38?q=80&w=1981&auto=format&fit=crop"
                        .into(),
            },
            Dish {
                name: "Burger Sabor da Rua".into(),
                description: "Pão brioche selado na manteiga, blend de carnes nobres, queijo \
                              cheddar, bacon crocante e molho especial."
                    .into(),
                price: "R$ 32,50".into(),
                image_src:
                    "https://images.unsplash.com/photo-1546069901-ba9599a7e63c?q=80&w=1780&auto=format&fit=crop"
                        .into(),
            },
            Dish {
                name: "Massa Fresca ao Pesto".into(),
                description: "Tagliatelle artesanal envolto em um pesto de manjericão fresco \
                              com nozes, parmesão e azeite extra virgem."
                    .into(),
                price: "R$ 38,00".into(),
                image_src:
                    "https://images.unsplash.com/photo-1604382354936-07c5d9983bd3?q=80&w=2070&auto=format&fit=crop"
                        .into(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_not_seed() {
        let empty = HeroContent::default();
        assert!(empty.title.is_empty());
        assert_ne!(empty, HeroContent::seed());
    }

    #[test]
    fn fields_serialize_in_camel_case() {
        let value = serde_json::to_value(HeroContent::seed()).unwrap();
        let map = value.as_object().unwrap();
        assert!(map.contains_key("buttonText"));
        assert!(map.contains_key("backgroundImageUrl"));
    }

    #[test]
    fn missing_fields_fall_through_to_empty() {
        // An old document written before `facebookUrl` existed.
        let stored = serde_json::json!({
            "title": "Entre em",
            "highlightedWord": "Contato",
        });
        let contact: ContactContent = serde_json::from_value(stored).unwrap();
        assert_eq!(contact.title, "Entre em");
        assert!(contact.facebook_url.is_empty());
        assert!(contact.email.is_empty());
    }

    #[test]
    fn settings_without_theme_deserialize_to_none() {
        let stored = serde_json::json!({ "establishmentName": "Sabor da Rua" });
        let settings: SiteSettings = serde_json::from_value(stored).unwrap();
        assert_eq!(settings.active_theme_name, None);
    }

    #[test]
    fn seed_settings_reference_the_default_theme() {
        let seed = SiteSettings::seed();
        assert_eq!(
            seed.active_theme_name.as_deref(),
            Some(crate::themes::default_theme().name)
        );
    }
}
