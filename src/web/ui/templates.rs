use askama::Template;
use askama_web::WebTemplate;

use crate::catalog::SatelliteChoice;

#[derive(Template, WebTemplate)]
#[template(path = "map.html")]
pub struct MapTemplate {
    pub satellites: Vec<SatelliteChoice>,
    pub selected: String,
    pub body_class: String,
    pub poll_ms: u128,
    pub loaded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(selected: &str) -> String {
        MapTemplate {
            satellites: vec![
                SatelliteChoice {
                    id: "iss".into(),
                    name: "ISS (ZARYA)".into(),
                },
                SatelliteChoice {
                    id: "starlink-0".into(),
                    name: "STARLINK-1007".into(),
                },
            ],
            selected: selected.into(),
            body_class: "dark".into(),
            poll_ms: 1000,
            loaded: true,
        }
        .render()
        .unwrap()
    }

    #[test]
    fn marks_the_selected_satellite() {
        let page = render("starlink-0");
        assert!(page.contains(r#"<body class="dark">"#));
        assert!(page.contains(r#"<option value="starlink-0" selected>STARLINK-1007</option>"#));
        assert!(page.contains(r#"<option value="iss" >ISS (ZARYA)</option>"#));
        assert!(page.contains("const POLL_MS = 1000;"));
        assert!(!page.contains("could not be loaded"));
    }

    #[test]
    fn fullscreen_is_handled_by_the_browser() {
        let page = render("iss");
        assert!(page.contains(r#"getElementById("stage").requestFullscreen()"#));
        assert!(page.contains("map.invalidateSize()"));
        assert!(page.contains(r#"<i id="fullscreen-icon" class="fa-solid fa-eye">"#));
    }
}
