//! Style filters that can be appended to an image prompt.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleFilter {
    pub name: &'static str,
    pub suffix: &'static str,
}

pub const STYLE_FILTERS: [StyleFilter; 11] = [
    StyleFilter {
        name: "Fotorealistisch",
        suffix: ", fotorealistisch, 8k, ultra-detailliert, professionelle Fotografie",
    },
    StyleFilter {
        name: "Cinematic",
        suffix: ", cinematic look, film grain, dramatic lighting",
    },
    StyleFilter {
        name: "Aquarell",
        suffix: ", im Stil eines Aquarellgemäldes, weiche Kanten, leuchtende Farben",
    },
    StyleFilter {
        name: "Vintage",
        suffix: ", im Stil eines Vintage-Fotos, sepia Tönung, leicht unscharf",
    },
    StyleFilter {
        name: "Neon-Punk",
        suffix: ", cyberpunk stil, neonlichter, futuristisch",
    },
    StyleFilter {
        name: "Minimalistisch",
        suffix: ", minimalistisch, klarlinige Kunst, einfacher Hintergrund",
    },
    StyleFilter {
        name: "Fantasy",
        suffix: ", fantasy-kunst, episch, mythisch, leuchtende Details",
    },
    StyleFilter {
        name: "Pop Art",
        suffix: ", Pop-Art-Stil, kräftige Farben, Comic-Look",
    },
    StyleFilter {
        name: "Isometrisch",
        suffix: ", isometrische 3D-Illustration, clean, Vektorgrafik",
    },
    StyleFilter {
        name: "Abstrakt",
        suffix: ", abstrakte Kunst, geometrische Formen, kühne Muster",
    },
    StyleFilter {
        name: "Paddyfilter",
        suffix: ", hochwertige, minimalistische Bleistiftzeichnung, klare Linien, wenige Motive, mit subtilen Pop-Art-Effekten im Hintergrund",
    },
];

/// Look up a filter by name, ignoring case.
pub fn find(name: &str) -> Option<&'static StyleFilter> {
    let name = name.trim();
    STYLE_FILTERS
        .iter()
        .find(|filter| filter.name.eq_ignore_ascii_case(name))
}

impl StyleFilter {
    /// Append the suffix unless the prompt already ends with it.
    pub fn apply(&self, prompt: &str) -> String {
        if prompt.ends_with(self.suffix) {
            prompt.to_string()
        } else {
            format!("{}{}", prompt, self.suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ignores_case() {
        assert_eq!(find("pop art").map(|f| f.name), Some("Pop Art"));
        assert!(find("Ölgemälde").is_none());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let filter = find("Vintage").unwrap();
        let once = filter.apply("Hund am See");
        assert_eq!(once, format!("Hund am See{}", filter.suffix));
        assert_eq!(filter.apply(&once), once);
    }
}
