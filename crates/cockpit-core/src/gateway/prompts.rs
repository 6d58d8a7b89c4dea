//! Prompt templates for the Gemini gateway.
//!
//! Each builder only interpolates its inputs; wording lives here so the
//! gateway code stays about transport.

use crate::models::SourceCitation;

/// Site root offered to the research step for internal linking.
pub const SITE_ROOT: &str = "https://www.willenskraft.co.at/";

pub fn research(topic: &str) -> String {
    format!(
        r#"Führe eine tiefgehende Webrecherche zum Thema "{topic}" durch. Deine oberste Priorität ist die Glaubwürdigkeit und Autorität der Quellen.
**Verwende ausschließlich moderne, wissenschaftlich fundierte Terminologien und Konzepte. Veraltete oder widerlegte Theorien (z.B. Dominanztheorie, Rudelführer-Konzepte) sind strikt zu vermeiden.** Der Fokus liegt auf positiver Verstärkung und tierschutzkonformen Ansätzen, wie sie im "Willenskraft"-Branding verankert sind.

**Erlaubte Quellen:**
*   Wissenschaftliche Studien und Forschungsartikel (z.B. PubMed, Google Scholar).
*   Publikationen angesehener Institutionen (Universitäten, Forschungsinstitute, staatliche Gesundheitsorganisationen).
*   Artikel aus etablierten, renommierten Fachmagazinen.

**Verbotene Quellen:**
*   Forenbeiträge, Social Media Posts oder nicht verifizierte Blogs.
*   Kommerzielle Websites ohne wissenschaftlichen Hintergrund.
*   Veraltete Forschung (älter als 10 Jahre, außer grundlegende Studien).

**Strukturierung der Recherche:**
1.  **Synthese der Forschung:** Fasse die wichtigsten wissenschaftlichen Erkenntnisse zusammen.
2.  **Integration der "Willenskraft"-Philosophie:** Erkläre, wie die Ergebnisse zur positiven Verstärkung passen.
3.  **SEO & Verlinkung:** Erstelle eine Liste mit 5-7 relevanten Keywords und 2-3 internen Links ({SITE_ROOT}) zu passenden Artikeln.

Strukturiere deine Antwort klar und präzise in Absätzen."#
    )
}

pub fn outline(
    topic: &str,
    research: &str,
    citations: &[SourceCitation],
    internal_links: &[String],
) -> String {
    let source_list = citations
        .iter()
        .map(SourceCitation::list_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"Basierend auf der folgenden Recherche erstelle eine detaillierte Gliederung für einen Blogartikel zum Thema "{topic}":

**Rechercheergebnisse:**
{research}

**Quellen:**
{source_list}

**Interne Links:**
{links}

**Anforderungen an die Gliederung:**
1.  **SEO-optimierte Struktur:** Klarer Titel (H1), gefolgt von logischen Abschnitten (H2, H3).
2.  **Inhaltliche Tiefe:** Jeder Abschnitt enthält konkrete, umsetzbare Informationen.
3.  **"Willenskraft"-Philosophie:** Positiver Ansatz, wissenschaftlich fundiert, tierschutzkonform.
4.  **Lesbarkeit:** Kurze, prägnante Absätze und klare Handlungsaufforderungen.

**Erwartete Gliederung:**
- SEO-Titel (H1)
- Einleitung (H2)
- 3-4 Hauptabschnitte (H2/H3)
- Fazit (H2)
- Meta-Informationen (SEO-Title, Beschreibung, Keywords)"#,
        links = internal_links.join(", "),
    )
}

pub fn content_part(topic: &str, outline: &str, previous_content: &str, part: u8) -> String {
    format!(
        r#"Schreibe Teil {part} des Blogartikels zum Thema "{topic}" basierend auf der folgenden Gliederung:

**Gliederung:**
{outline}

**Bisher geschriebener Inhalt:**
{previous_content}

**Anforderungen für diesen Teil:**
- Schreibe nur den nächsten Abschnitt der Gliederung
- Behalte den positiven, wissenschaftlichen Ton bei
- Integriere die "Willenskraft"-Philosophie
- Füge SEO-relevante Keywords natürlich ein
- Länge: ca. 300-500 Wörter

**Formatierung:**
- HTML-Tags für Überschriften (h2, h3)
- Absätze mit <p>-Tags, wichtige Begriffe mit <strong>
- Listen mit <ul> und <li>, wo angemessen"#
    )
}

pub fn revise(content: &str, feedback: &str) -> String {
    format!(
        r#"Überarbeite den folgenden Inhalt basierend auf dem Feedback:

**Aktueller Inhalt:**
{content}

**Feedback:**
{feedback}

**Anforderungen für die Überarbeitung:**
- Berücksichtige das gesamte Feedback
- Behalte die HTML-Struktur bei
- Stärke die "Willenskraft"-Philosophie und optimiere für SEO
- Halte den positiven, wissenschaftlichen Ton bei"#
    )
}

pub fn production_package(content: &str) -> String {
    format!(
        r#"Erstelle vollständigen, WordPress-kompatiblen HTML-Code aus dem folgenden Inhalt:

**Inhalt:**
{content}

**Anforderungen an den HTML-Code:**
1.  Keine <script>-Tags, nur HTML und CSS.
2.  Ein einziges <style>-Tag direkt im HTML.
3.  Selektoren gehärtet über :is(.entry-content,.wp-block-post-content,.post-content,.wp-block-group,.prose,body), !important nur sparsam bei Links/Buttons.
4.  Icons als <span class="paw">🐾</span> statt ::before.
5.  Full-Bleed am Desktop: width:100vw und margin-left/right: calc(50% - 50vw).
6.  Innencontainer .willenskraft-article-inner mit max-width:1200px und Padding.
7.  Keyframe fadeUp mit gestaffelter animation-delay für .fade-in-element.

**Ergebnis:** 1 Block für "Benutzerdefiniertes HTML", volle Breite am Desktop, stabil gegen Theme-Kollisionen."#
    )
}

pub fn image(prompt: &str, with_reference: bool) -> String {
    if with_reference {
        format!("Erstelle ein Bild im Stil des Referenzbildes mit folgendem Motiv: {prompt}")
    } else {
        format!("Erstelle ein professionelles Bild zum Thema: {prompt}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_lists_sources_and_links() {
        let citations = vec![
            SourceCitation::new("https://a.example", "Studie A"),
            SourceCitation::new("https://b.example", "Studie B"),
        ];
        let links = vec!["https://x.example/".to_string(), "https://y.example/".to_string()];
        let prompt = outline("Leinenführigkeit", "Ergebnisse", &citations, &links);

        assert!(prompt.contains("\"Leinenführigkeit\""));
        assert!(prompt.contains("- Studie A: https://a.example\n- Studie B: https://b.example"));
        assert!(prompt.contains("https://x.example/, https://y.example/"));
    }

    #[test]
    fn test_content_part_mentions_part_number() {
        let prompt = content_part("Rückruf", "Gliederung", "", 2);
        assert!(prompt.starts_with("Schreibe Teil 2 des Blogartikels"));
    }

    #[test]
    fn test_image_prompt_variants() {
        assert!(image("Hund", true).contains("Referenzbildes"));
        assert!(image("Hund", false).ends_with("zum Thema: Hund"));
    }
}
