/*
 * Static bootstrap templates. These are fixed text blobs compiled into the
 * binary; the setup script carries a single `$STYLE` placeholder that the
 * generation step replaces with the component library's stylesheet URL.
 */

pub const TSCONFIG_TEMPLATE: &str = include_str!("template/tsconfig.json");
pub const WELCOME_TEMPLATE: &str = include_str!("template/welcome.vue");
pub const NEW_FILE_TEMPLATE: &str = include_str!("template/new_file.vue");
pub const SETUP_TEMPLATE: &str = include_str!("template/setup.js");
pub const MAIN_TEMPLATE: &str = include_str!("template/main.vue");

pub const STYLE_PLACEHOLDER: &str = "$STYLE";

// Only the first occurrence is substituted.
pub fn render_setup(stylesheet_url: &str) -> String {
    SETUP_TEMPLATE.replacen(STYLE_PLACEHOLDER, stylesheet_url, 1)
}
