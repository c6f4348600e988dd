//! Editable site content singletons

use serde::{Deserialize, Serialize};

/// Homepage content (document `settings/homepage`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HomepageSettings {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_images: Vec<String>,
    pub mission_title: String,
    pub mission_text: String,
    pub vision_title: String,
    pub vision_text: String,
    pub about_text: String,
    pub about_images: Vec<String>,
}

impl Default for HomepageSettings {
    fn default() -> Self {
        Self {
            hero_title: "EXPLORE THE UNIVERSE".to_string(),
            hero_subtitle: "Join the NCSS on a journey through space, science, and innovation. We are the future of exploration.".to_string(),
            hero_images: vec![
                "https://images.unsplash.com/photo-1451187580459-43490279c0fa?q=80&w=2072&auto=format&fit=crop".to_string(),
                "https://images.unsplash.com/photo-1446776811953-ad5497f3581a?q=80&w=2072&auto=format&fit=crop".to_string(),
                "https://images.unsplash.com/photo-1444703686981-a3abbc4d4fe3?q=80&w=2072&auto=format&fit=crop".to_string(),
            ],
            mission_title: "Our Mission".to_string(),
            mission_text: "To inspire the next generation of scientists and explorers through practical education and immersive experiences.".to_string(),
            vision_title: "Our Vision".to_string(),
            vision_text: "A world where scientific literacy is universal and space exploration is accessible to all.".to_string(),
            about_text: "NCSS is dedicated to fostering curiosity and innovation in the field of space exploration.".to_string(),
            about_images: Vec::new(),
        }
    }
}

/// Footer link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: String,
    pub name: String,
    pub url: String,
}

/// Footer content (document `site_config/footer_data`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FooterSettings {
    pub about_text: String,
    pub social_links: Vec<SocialLink>,
}

impl Default for FooterSettings {
    fn default() -> Self {
        let link = |id: &str, name: &str| SocialLink {
            id: id.to_string(),
            name: name.to_string(),
            url: "#".to_string(),
        };

        Self {
            about_text: "Advancing humanity through the exploration of the cosmos. Join the Next-Gen Cosmos Science Society today.".to_string(),
            social_links: vec![
                link("1", "Twitter"),
                link("2", "Instagram"),
                link("3", "LinkedIn"),
            ],
        }
    }
}
