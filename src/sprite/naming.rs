use std::path::Path;

/// Button state names, in the order they should appear on the sheet
const BUTTON_STATES: &[(&[&str], &str)] = &[
    (&["normal"], "01_normal"),
    (&["highlighted", "hover"], "02_highlighted"),
    (&["pressed", "clicked"], "03_pressed"),
    (&["disabled"], "04_disabled"),
];

/// Map a UI button frame name onto an ordered state name.
///
/// Names that match no known state are returned unchanged.
pub fn button_state_name(name: &str) -> String {
    BUTTON_STATES
        .iter()
        .find(|(keys, _)| keys.iter().any(|key| name.contains(key)))
        .map(|(_, state)| (*state).to_string())
        .unwrap_or_else(|| name.to_string())
}

/// Sprite name for a file: the file name without its extension
pub fn sprite_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Prefix a frame suffix with a sheet name, e.g. `hero_run` + `3` -> `hero_run_3`
pub fn frame_name(sheet: Option<&str>, suffix: &str) -> String {
    match sheet {
        Some(sheet) if !sheet.is_empty() => format!("{}_{}", sheet, suffix),
        _ => suffix.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_state_name() {
        assert_eq!(button_state_name("play_normal"), "01_normal");
        assert_eq!(button_state_name("play_hover"), "02_highlighted");
        assert_eq!(button_state_name("play_highlighted"), "02_highlighted");
        assert_eq!(button_state_name("play_clicked"), "03_pressed");
        assert_eq!(button_state_name("play_pressed"), "03_pressed");
        assert_eq!(button_state_name("play_disabled"), "04_disabled");
        assert_eq!(button_state_name("play_idle"), "play_idle");
    }

    #[test]
    fn test_sprite_name_strips_extension() {
        assert_eq!(sprite_name(Path::new("frames/run_01.png")), "run_01");
        assert_eq!(sprite_name(Path::new("RUN_02.PNG")), "RUN_02");
    }

    #[test]
    fn test_frame_name() {
        assert_eq!(frame_name(Some("hero_run"), "3"), "hero_run_3");
        assert_eq!(frame_name(Some(""), "3"), "3");
        assert_eq!(frame_name(None, "idle"), "idle");
    }
}
