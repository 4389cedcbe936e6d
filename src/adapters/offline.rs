//! Deterministic offline generator.
//!
//! Used when no provider is configured or every provider failed, so the
//! attempt loop always has output to validate. The request text is
//! classified by an ordered keyword table (first match wins) and a canned
//! component is rendered with the design tokens actually present.

use std::sync::Arc;

use tracing::info;

use crate::core::prompt::extract_request;
use crate::domain::{ComponentArtifact, DesignSystem};

/// Canned component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Register,
    Navbar,
    Dashboard,
    Profile,
    Buttons,
    Login,
}

/// Ordered decision table. The final entry has no keywords and always matches.
const RULES: &[(&[&str], Template)] = &[
    (&["register", "signup", "sign up", "create account"], Template::Register),
    (&["navbar", "navigation", "nav bar", "header", "topbar"], Template::Navbar),
    (&["dashboard", "stats", "analytics", "overview", "metric"], Template::Dashboard),
    (&["profile", "user card", "avatar", "account"], Template::Profile),
    (&["button", "btn", "cta"], Template::Buttons),
    (&[], Template::Login),
];

impl Template {
    /// Pick the template for a request
    pub fn classify(request: &str) -> Template {
        let request = request.to_lowercase();
        RULES
            .iter()
            .find(|(keywords, _)| keywords.is_empty() || keywords.iter().any(|k| request.contains(k)))
            .map(|(_, template)| *template)
            .unwrap_or(Template::Login)
    }

    /// Angular class name
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Register => "RegisterComponent",
            Self::Navbar => "NavbarComponent",
            Self::Dashboard => "DashboardComponent",
            Self::Profile => "ProfileComponent",
            Self::Buttons => "ButtonShowcaseComponent",
            Self::Login => "LoginComponent",
        }
    }

    /// Angular selector
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Register => "app-register",
            Self::Navbar => "app-navbar",
            Self::Dashboard => "app-dashboard",
            Self::Profile => "app-profile",
            Self::Buttons => "app-buttons",
            Self::Login => "app-login",
        }
    }
}

/// Token values used by the templates
struct Palette<'a> {
    primary: &'a str,
    bg: &'a str,
    radius: &'a str,
}

#[derive(Debug, Clone)]
pub struct OfflineGenerator {
    design: Arc<DesignSystem>,
}

impl OfflineGenerator {
    pub fn new(design: Arc<DesignSystem>) -> Self {
        Self { design }
    }

    /// Produce a JSON-encoded artifact for the request embedded in `prompt`
    pub fn generate(&self, prompt: &str) -> String {
        self.generate_for_request(extract_request(prompt))
    }

    /// Produce a JSON-encoded artifact for a bare user request
    pub fn generate_for_request(&self, request: &str) -> String {
        let template = Template::classify(request);
        info!(?template, "Using offline generator");

        let artifact = self.render(template, request);
        serde_json::to_string(&artifact).unwrap_or_default()
    }

    /// Render a template with the design tokens
    pub fn render(&self, template: Template, request: &str) -> ComponentArtifact {
        let palette = Palette {
            primary: self.design.primary_color(),
            bg: self.design.glass_background(),
            radius: self.design.border_radius(),
        };

        let html = match template {
            Template::Register => register_html(&palette),
            Template::Navbar => navbar_html(&palette),
            Template::Dashboard => dashboard_html(&palette),
            Template::Profile => profile_html(&palette),
            Template::Buttons => buttons_html(&palette),
            Template::Login => {
                let title = if request.to_lowercase().contains("login") {
                    "Login"
                } else {
                    "Sign In"
                };
                login_html(&palette, title)
            }
        };

        let class_name = template.class_name();
        let selector = template.selector();
        let file_stem = selector.trim_start_matches("app-");

        let css = format!(
            "/* {} styles - using {} primary token */ * {{ font-family: {}; }}",
            class_name,
            palette.primary,
            self.design.font_family()
        );

        let typescript = format!(
            "import {{ Component }} from '@angular/core';\n\n\
             @Component({{\n  \
             selector: '{selector}',\n  \
             standalone: true,\n  \
             templateUrl: './{stem}.component.html',\n  \
             styleUrls: ['./{stem}.component.css']\n\
             }})\n\
             export class {class} {{}}",
            selector = selector,
            stem = file_stem,
            class = class_name,
        );

        ComponentArtifact::new(html, css, typescript)
    }
}

fn register_html(p: &Palette<'_>) -> String {
    let field = |kind: &str, placeholder: &str, margin: &str| {
        format!(
            r#"    <div class="{margin}"><input type="{kind}" placeholder="{placeholder}" class="w-full px-4 py-2 rounded-lg border text-sm" style="border-color:{primary};border-radius:{radius};"></div>"#,
            margin = margin,
            kind = kind,
            placeholder = placeholder,
            primary = p.primary,
            radius = p.radius,
        )
    };

    [
        r#"<div class="flex items-center justify-center min-h-screen">"#.to_string(),
        format!(
            r#"  <div class="p-8 w-96" style="background:{};backdrop-filter:blur(12px);border-radius:{};border:1px solid rgba(255,255,255,0.25);">"#,
            p.bg, p.radius
        ),
        format!(
            r#"    <h2 class="text-2xl font-bold mb-1 text-center" style="color:{}">Create Account</h2>"#,
            p.primary
        ),
        r#"    <p class="text-center text-sm text-gray-400 mb-6">Join us today - it's free</p>"#.to_string(),
        field("text", "Full Name", "mb-3"),
        field("email", "Email address", "mb-3"),
        field("password", "Password", "mb-3"),
        field("password", "Confirm password", "mb-5"),
        format!(
            r#"    <button class="w-full py-2.5 font-semibold text-white text-sm rounded-lg" style="background:{};border-radius:{};">Register</button>"#,
            p.primary, p.radius
        ),
        format!(
            r#"    <p class="text-center text-xs mt-4 text-gray-400">Already have an account? <span style="color:{};cursor:pointer;">Sign in</span></p>"#,
            p.primary
        ),
        "  </div>".to_string(),
        "</div>".to_string(),
    ]
    .join("\n")
}

fn navbar_html(p: &Palette<'_>) -> String {
    let links = ["Home", "About", "Features", "Pricing"]
        .iter()
        .map(|label| {
            format!(
                r##"    <a href="#" class="text-white text-sm opacity-80 hover:opacity-100">{}</a>"##,
                label
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<nav class="flex items-center justify-between px-8 py-4 shadow-md" style="background:{primary};border-radius:{radius};">
  <div class="flex items-center gap-3">
    <div class="w-8 h-8 bg-white rounded-lg flex items-center justify-center font-bold text-sm" style="color:{primary}">A</div>
    <span class="font-bold text-white text-lg">AppName</span>
  </div>
  <div class="flex items-center gap-6">
{links}
    <button class="px-4 py-1.5 bg-white text-sm font-semibold rounded-full" style="color:{primary};">Get Started</button>
  </div>
</nav>"#,
        primary = p.primary,
        radius = p.radius,
        links = links,
    )
}

fn dashboard_html(p: &Palette<'_>) -> String {
    let stats = [("1,284", "Total Users"), ("$9,420", "Revenue"), ("98.2%", "Uptime")]
        .iter()
        .map(|(value, label)| {
            format!(
                r#"    <div class="p-5 rounded-xl border text-center" style="border-color:{primary};border-radius:{radius};">
      <div class="text-3xl font-bold" style="color:{primary}">{value}</div>
      <div class="text-sm text-gray-500 mt-1">{label}</div>
    </div>"#,
                primary = p.primary,
                radius = p.radius,
                value = value,
                label = label,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let activity = [
        ("User John signed up", "2m ago"),
        ("Order #1042 placed", "15m ago"),
        ("Server restarted", "1h ago"),
    ]
    .iter()
    .map(|(what, when)| {
        format!(
            r#"      <div class="flex justify-between"><span>{}</span><span>{}</span></div>"#,
            what, when
        )
    })
    .collect::<Vec<_>>()
    .join("\n");

    format!(
        r##"<div class="p-6 w-full max-w-3xl">
  <h1 class="text-2xl font-bold mb-6" style="color:{primary}">Dashboard Overview</h1>
  <div class="grid grid-cols-3 gap-4 mb-6">
{stats}
  </div>
  <div class="p-5 rounded-xl border" style="border-radius:{radius};border-color:#e5e7eb;">
    <div class="text-sm font-semibold mb-3 text-gray-600">Recent Activity</div>
    <div class="space-y-2 text-sm text-gray-500">
{activity}
    </div>
  </div>
</div>"##,
        primary = p.primary,
        radius = p.radius,
        stats = stats,
        activity = activity,
    )
}

fn profile_html(p: &Palette<'_>) -> String {
    format!(
        r#"<div class="flex items-center justify-center min-h-screen">
  <div class="p-8 w-80 text-center" style="background:{bg};backdrop-filter:blur(12px);border-radius:{radius};border:1px solid rgba(255,255,255,0.2);">
    <div class="w-20 h-20 rounded-full mx-auto mb-4 flex items-center justify-center text-white text-2xl font-bold" style="background:{primary}">JD</div>
    <h2 class="text-xl font-bold text-white mb-1">John Doe</h2>
    <p class="text-sm text-gray-400 mb-4">john@example.com</p>
    <div class="flex justify-center gap-4 mb-5 text-center text-sm text-gray-300">
      <div><div class="font-bold text-white">128</div><div>Posts</div></div>
      <div><div class="font-bold text-white">4.2k</div><div>Followers</div></div>
      <div><div class="font-bold text-white">310</div><div>Following</div></div>
    </div>
    <button class="w-full py-2 text-white font-semibold text-sm rounded-lg" style="background:{primary};border-radius:{radius};">Edit Profile</button>
  </div>
</div>"#,
        bg = p.bg,
        primary = p.primary,
        radius = p.radius,
    )
}

fn buttons_html(p: &Palette<'_>) -> String {
    format!(
        r#"<div class="flex flex-wrap gap-4 items-center justify-center p-8">
  <button class="px-6 py-2.5 font-semibold text-white rounded-lg" style="background:{primary};border-radius:{radius};">Primary</button>
  <button class="px-6 py-2.5 font-semibold rounded-lg border-2" style="border-color:{primary};color:{primary};border-radius:{radius};">Outline</button>
  <button class="px-6 py-2.5 font-semibold text-white rounded-lg opacity-50 cursor-not-allowed" style="background:{primary};border-radius:{radius};" disabled>Disabled</button>
  <button class="px-6 py-2.5 font-semibold text-white rounded-full" style="background:{primary};">Rounded</button>
  <button class="px-4 py-2 text-sm font-medium text-white rounded-lg flex items-center gap-2" style="background:{primary};border-radius:{radius};">
    <svg class="w-4 h-4" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M12 4v16m8-8H4"/></svg>
    Add Item
  </button>
</div>"#,
        primary = p.primary,
        radius = p.radius,
    )
}

fn login_html(p: &Palette<'_>, title: &str) -> String {
    format!(
        r#"<div class="flex items-center justify-center min-h-screen">
  <div class="p-8 w-96" style="background:{bg};backdrop-filter:blur(12px);border-radius:{radius};border:1px solid rgba(255,255,255,0.2);">
    <h2 class="text-2xl font-bold mb-6 text-center" style="color:{primary}">{title}</h2>
    <div class="mb-4"><label class="block text-sm font-medium mb-1">Email</label>
      <input type="email" placeholder="you@example.com" class="w-full px-4 py-2 rounded-lg border text-sm" style="border-color:{primary};border-radius:{radius};"></div>
    <div class="mb-6"><label class="block text-sm font-medium mb-1">Password</label>
      <input type="password" placeholder="********" class="w-full px-4 py-2 rounded-lg border text-sm" style="border-color:{primary};border-radius:{radius};"></div>
    <button class="w-full py-2.5 font-semibold text-white text-sm rounded-lg" style="background:{primary};border-radius:{radius};">{title}</button>
    <p class="text-center text-xs mt-4" style="color:{primary};cursor:pointer;">Forgot password?</p>
  </div>
</div>"#,
        bg = p.bg,
        primary = p.primary,
        radius = p.radius,
        title = title,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Validator;

    fn generator(tokens: &[(&str, &str)]) -> OfflineGenerator {
        OfflineGenerator::new(Arc::new(DesignSystem::from_tokens(tokens.iter().copied())))
    }

    #[test]
    fn test_classify_first_match_wins() {
        assert_eq!(Template::classify("A signup form"), Template::Register);
        assert_eq!(Template::classify("Top NAVBAR with links"), Template::Navbar);
        assert_eq!(Template::classify("analytics overview"), Template::Dashboard);
        assert_eq!(Template::classify("user avatar card"), Template::Profile);
        assert_eq!(Template::classify("a CTA button"), Template::Buttons);
        assert_eq!(Template::classify("something else"), Template::Login);
        // "create account" is a register phrase even though "account" is a profile keyword
        assert_eq!(Template::classify("create account page"), Template::Register);
        // header beats button because navbar rules come first
        assert_eq!(Template::classify("header with a button"), Template::Navbar);
    }

    #[test]
    fn test_login_title_follows_request() {
        let generator = generator(&[]);
        let login = generator.render(Template::Login, "a login card");
        assert!(login.html.contains(">Login</h2>"));

        let sign_in = generator.render(Template::Login, "an auth card");
        assert!(sign_in.html.contains(">Sign In</h2>"));
    }

    #[test]
    fn test_uses_configured_tokens() {
        let generator = generator(&[("primary-color", "#0EA5E9"), ("font-family", "Roboto")]);
        let artifact = generator.render(Template::Dashboard, "dashboard");

        assert!(artifact.html.contains("#0EA5E9"));
        assert!(artifact.css.contains("font-family: Roboto;"));
        assert!(artifact.typescript.contains("export class DashboardComponent {}"));
        assert!(artifact.typescript.contains("selector: 'app-dashboard'"));
        assert!(artifact.typescript.contains("./dashboard.component.html"));
    }

    #[test]
    fn test_every_template_passes_validation() {
        let design = Arc::new(DesignSystem::from_tokens([("primary-color", "#123ABC")]));
        let generator = OfflineGenerator::new(design.clone());
        let validator = Validator::new(&design);

        for request in [
            "register",
            "navbar",
            "dashboard",
            "profile",
            "button",
            "login",
            "anything",
        ] {
            let raw = generator.generate(request);
            let outcome = validator.validate(&raw);
            assert!(outcome.is_valid(), "{}: {:?}", request, outcome.errors());
        }
    }

    #[test]
    fn test_generate_reads_request_after_marker() {
        let generator = generator(&[]);
        let prompt = "Use MatButton where helpful.\nUSER REQUEST: a profile page";
        let raw = generator.generate(prompt);
        assert!(raw.contains("ProfileComponent"));
    }
}
