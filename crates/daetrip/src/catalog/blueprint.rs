use super::Site;

pub(super) fn daejeon_sites() -> Vec<Site> {
    site_templates()
        .into_iter()
        .map(|(name, lat, lon, description)| Site {
            description: Some(description.to_string()),
            ..Site::new(name, lat, lon)
        })
        .collect()
}

fn site_templates() -> Vec<(&'static str, f64, f64, &'static str)> {
    vec![
        (
            "Daejeon Expo Park",
            36.3730,
            127.3847,
            "Site of the 1993 Taejon Expo with the Hanbit Tower.",
        ),
        (
            "Yuseong Hot Springs",
            36.3565,
            127.3279,
            "Public foot baths and spa hotels in Yuseong-gu.",
        ),
        (
            "National Science Museum",
            36.3746,
            127.3722,
            "Hands-on science halls, planetarium and natural history exhibits.",
        ),
        (
            "Hanbat Arboretum",
            36.3058,
            127.3381,
            "Large urban arboretum beside the Gapcheon stream.",
        ),
        (
            "Daejeon Museum of Art",
            36.3519,
            127.3891,
            "Modern and contemporary Korean art.",
        ),
        (
            "Gyejoksan Mountain",
            36.2908,
            127.3338,
            "Barefoot red-clay trail and Gyejoksanseong fortress.",
        ),
        (
            "Ppuri Park",
            36.3414,
            127.3938,
            "Family-name genealogy park with carved surname monuments.",
        ),
        (
            "Daejeon O-World",
            36.2902,
            127.4011,
            "Zoo, flower garden and amusement park.",
        ),
    ]
}
