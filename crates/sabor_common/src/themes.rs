//! Compiled-in color-theme catalog.
//!
//! The remote `siteSettings` document only records *which* entry is active;
//! the variable maps themselves never leave the binary. Every theme carries
//! the complete set of style variables (consumed elsewhere as CSS custom
//! properties), so applying a theme is a full per-key overwrite.

/// One named, complete style-variable map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorTheme {
    pub name: &'static str,
    /// `(variable, value)` pairs, e.g. `("--primary", "196 80% 52%")`.
    pub colors: &'static [(&'static str, &'static str)],
}

impl ColorTheme {
    /// Value of a single style variable, if the theme defines it.
    pub fn color(&self, variable: &str) -> Option<&'static str> {
        self.colors
            .iter()
            .find(|(key, _)| *key == variable)
            .map(|(_, value)| *value)
    }
}

/// The theme used when no valid selection is stored anywhere.
pub fn default_theme() -> &'static ColorTheme {
    &THEMES[0]
}

/// Look a theme up by name, falling back to the catalog's first entry for an
/// unknown or absent name. A stale name stored remotely must never make the
/// apply step fail.
pub fn resolve_theme(name: Option<&str>) -> &'static ColorTheme {
    match name {
        Some(name) => THEMES
            .iter()
            .find(|theme| theme.name == name)
            .unwrap_or_else(default_theme),
        None => default_theme(),
    }
}

/// Every theme the admin can pick from.
pub static THEMES: &[ColorTheme] = &[
    ColorTheme {
        name: "Padrão Escuro (Azul Brilhante)",
        colors: &[
            ("--background", "270 8% 13%"),
            ("--foreground", "240 3% 78%"),
            ("--card", "270 8% 18%"),
            ("--card-foreground", "240 3% 78%"),
            ("--popover", "270 8% 18%"),
            ("--popover-foreground", "240 3% 78%"),
            ("--primary", "196 80% 52%"),
            ("--primary-foreground", "210 40% 98%"),
            ("--secondary", "270 2% 55%"),
            ("--secondary-foreground", "240 3% 78%"),
            ("--muted", "270 5% 30%"),
            ("--muted-foreground", "240 4% 65%"),
            ("--accent", "200 85% 60%"),
            ("--accent-foreground", "210 40% 98%"),
            ("--destructive", "0 84.2% 60.2%"),
            ("--destructive-foreground", "0 0% 98%"),
            ("--border", "270 5% 25%"),
            ("--input", "270 5% 22%"),
            ("--ring", "196 80% 52%"),
            ("--radius", "0.5rem"),
            ("--sidebar-background", "270 8% 16%"),
            ("--sidebar-foreground", "240 3% 80%"),
            ("--sidebar-primary", "196 80% 52%"),
            ("--sidebar-primary-foreground", "210 40% 98%"),
            ("--sidebar-accent", "200 85% 60%"),
            ("--sidebar-accent-foreground", "210 40% 98%"),
            ("--sidebar-border", "270 5% 28%"),
            ("--sidebar-ring", "196 80% 52%"),
        ],
    },
    ColorTheme {
        name: "Roxo Vibrante",
        colors: &[
            ("--background", "266 40% 10%"),
            ("--foreground", "270 10% 85%"),
            ("--card", "266 40% 15%"),
            ("--card-foreground", "270 10% 85%"),
            ("--popover", "266 40% 15%"),
            ("--popover-foreground", "270 10% 85%"),
            ("--primary", "280 80% 60%"),
            ("--primary-foreground", "0 0% 98%"),
            ("--secondary", "270 20% 45%"),
            ("--secondary-foreground", "270 10% 85%"),
            ("--muted", "270 15% 30%"),
            ("--muted-foreground", "270 10% 65%"),
            ("--accent", "300 70% 65%"),
            ("--accent-foreground", "0 0% 98%"),
            ("--destructive", "0 84.2% 60.2%"),
            ("--destructive-foreground", "0 0% 98%"),
            ("--border", "266 30% 25%"),
            ("--input", "266 30% 20%"),
            ("--ring", "280 80% 60%"),
            ("--radius", "0.5rem"),
            ("--sidebar-background", "266 40% 12%"),
            ("--sidebar-foreground", "270 10% 88%"),
            ("--sidebar-primary", "280 80% 60%"),
            ("--sidebar-primary-foreground", "0 0% 98%"),
            ("--sidebar-accent", "300 70% 65%"),
            ("--sidebar-accent-foreground", "0 0% 98%"),
            ("--sidebar-border", "266 30% 28%"),
            ("--sidebar-ring", "280 80% 60%"),
        ],
    },
    ColorTheme {
        name: "Verde Natureza",
        colors: &[
            ("--background", "120 20% 10%"),
            ("--foreground", "100 10% 80%"),
            ("--card", "120 20% 15%"),
            ("--card-foreground", "100 10% 80%"),
            ("--popover", "120 20% 15%"),
            ("--popover-foreground", "100 10% 80%"),
            ("--primary", "140 60% 45%"),
            ("--primary-foreground", "0 0% 98%"),
            ("--secondary", "110 25% 40%"),
            ("--secondary-foreground", "100 10% 80%"),
            ("--muted", "100 15% 30%"),
            ("--muted-foreground", "100 10% 60%"),
            ("--accent", "90 50% 55%"),
            ("--accent-foreground", "0 0% 98%"),
            ("--destructive", "0 84.2% 60.2%"),
            ("--destructive-foreground", "0 0% 98%"),
            ("--border", "120 15% 25%"),
            ("--input", "120 15% 20%"),
            ("--ring", "140 60% 45%"),
            ("--radius", "0.5rem"),
            ("--sidebar-background", "120 20% 12%"),
            ("--sidebar-foreground", "100 10% 82%"),
            ("--sidebar-primary", "140 60% 45%"),
            ("--sidebar-primary-foreground", "0 0% 98%"),
            ("--sidebar-accent", "90 50% 55%"),
            ("--sidebar-accent-foreground", "0 0% 98%"),
            ("--sidebar-border", "120 15% 28%"),
            ("--sidebar-ring", "140 60% 45%"),
        ],
    },
    ColorTheme {
        name: "Pôr do Sol Quente",
        colors: &[
            ("--background", "25 40% 12%"),
            ("--foreground", "30 20% 85%"),
            ("--card", "25 40% 18%"),
            ("--card-foreground", "30 20% 85%"),
            ("--popover", "25 40% 18%"),
            ("--popover-foreground", "30 20% 85%"),
            ("--primary", "30 90% 55%"),
            ("--primary-foreground", "0 0% 98%"),
            ("--secondary", "20 50% 50%"),
            ("--secondary-foreground", "30 20% 85%"),
            ("--muted", "20 30% 35%"),
            ("--muted-foreground", "30 15% 65%"),
            ("--accent", "45 80% 60%"),
            ("--accent-foreground", "0 0% 98%"),
            ("--destructive", "0 84.2% 60.2%"),
            ("--destructive-foreground", "0 0% 98%"),
            ("--border", "25 30% 28%"),
            ("--input", "25 30% 22%"),
            ("--ring", "30 90% 55%"),
            ("--radius", "0.5rem"),
            ("--sidebar-background", "25 40% 14%"),
            ("--sidebar-foreground", "30 20% 88%"),
            ("--sidebar-primary", "30 90% 55%"),
            ("--sidebar-primary-foreground", "0 0% 98%"),
            ("--sidebar-accent", "45 80% 60%"),
            ("--sidebar-accent-foreground", "0 0% 98%"),
            ("--sidebar-border", "25 30% 30%"),
            ("--sidebar-ring", "30 90% 55%"),
        ],
    },
    ColorTheme {
        name: "Claro Elegante (Azul Primário)",
        colors: &[
            ("--background", "0 0% 100%"),
            ("--foreground", "240 10% 15%"),
            ("--card", "0 0% 96%"),
            ("--card-foreground", "240 10% 15%"),
            ("--popover", "0 0% 96%"),
            ("--popover-foreground", "240 10% 15%"),
            ("--primary", "196 80% 52%"),
            ("--primary-foreground", "210 40% 98%"),
            ("--secondary", "240 5% 85%"),
            ("--secondary-foreground", "240 10% 25%"),
            ("--muted", "240 5% 90%"),
            ("--muted-foreground", "240 5% 50%"),
            ("--accent", "200 85% 60%"),
            ("--accent-foreground", "210 40% 98%"),
            ("--destructive", "0 84.2% 60.2%"),
            ("--destructive-foreground", "0 0% 98%"),
            ("--border", "240 5% 88%"),
            ("--input", "0 0% 94%"),
            ("--ring", "196 80% 52%"),
            ("--radius", "0.5rem"),
            ("--sidebar-background", "0 0% 98%"),
            ("--sidebar-foreground", "240 10% 20%"),
            ("--sidebar-primary", "196 80% 52%"),
            ("--sidebar-primary-foreground", "210 40% 98%"),
            ("--sidebar-accent", "200 85% 60%"),
            ("--sidebar-accent-foreground", "210 40% 98%"),
            ("--sidebar-border", "240 5% 90%"),
            ("--sidebar-ring", "196 80% 52%"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_unique_names() {
        for (i, a) in THEMES.iter().enumerate() {
            for b in &THEMES[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn every_theme_defines_the_same_variables() {
        let reference: Vec<&str> = THEMES[0].colors.iter().map(|(key, _)| *key).collect();
        for theme in THEMES {
            let keys: Vec<&str> = theme.colors.iter().map(|(key, _)| *key).collect();
            assert_eq!(keys, reference, "theme {} diverges", theme.name);
        }
    }

    #[test]
    fn resolve_falls_back_to_first_entry() {
        assert_eq!(resolve_theme(None).name, THEMES[0].name);
        assert_eq!(resolve_theme(Some("Tema Removido")).name, THEMES[0].name);
        assert_eq!(resolve_theme(Some("Roxo Vibrante")).name, "Roxo Vibrante");
    }

    #[test]
    fn color_lookup() {
        let roxo = resolve_theme(Some("Roxo Vibrante"));
        assert_eq!(roxo.color("--primary"), Some("280 80% 60%"));
        assert_eq!(roxo.color("--missing"), None);
    }
}
