use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
    pub label: &'static str,
    /// Label for the header button that switches away from this theme.
    pub toggle_label: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            label: "dark",
            toggle_label: "Light mode",
        },
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            label: "light",
            toggle_label: "Dark mode",
        },
    }
}

pub fn switched_message(mode: ThemeMode) -> String {
    format!("Switched to {} mode", theme_definition(mode).label)
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #0f1115;
    --color-bg-secondary: #171a21;
    --color-bg-overlay: rgba(15, 17, 21, 0.92);
    --color-text-primary: #f2f2f2;
    --color-text-muted: #9aa0aa;
    --color-border: #2b303a;
    --color-surface-muted: #1f232c;
    --color-input-bg: #12151b;
    --color-chat-user-bg: #2f6fed;
    --color-chat-user-text: #ffffff;
    --color-chat-bot-bg: #1f232c;
    --color-chat-bot-text: #f2f2f2;
    --color-accent: #f5b301;
    --color-success: #2fbf71;
    --color-warning: #f5b301;
    --color-error: #e5484d;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-bg-secondary: #f4f5f7;
    --color-bg-overlay: rgba(255, 255, 255, 0.94);
    --color-text-primary: #15171a;
    --color-text-muted: #5b6270;
    --color-border: #d6d9df;
    --color-surface-muted: #eceef2;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #2f6fed;
    --color-chat-user-text: #ffffff;
    --color-chat-bot-bg: #f0f1f4;
    --color-chat-bot-text: #15171a;
    --color-accent: #d99a00;
    --color-success: #1f9d5a;
    --color-warning: #b07b00;
    --color-error: #c9363b;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
"#;
