use axum::{
    extract::{Query, State},
    response::Html,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    access::{Action, Tier, can_perform, can_view},
    session::Session,
    web::{AppState, escape_html, flash, guard, render_footer},
};

#[derive(Default, Deserialize)]
pub struct LandingQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

pub async fn landing_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<LandingQuery>,
) -> Html<String> {
    let session = guard::current_session(&state, &jar).await;
    Html(render_landing(&session, &params))
}

fn render_landing(session: &Session, params: &LandingQuery) -> String {
    let flash = flash::compose_flash_message(params.status.as_deref(), params.error.as_deref());
    let footer = render_footer();

    let mut cards = Vec::new();
    for (tier, description) in [
        (Tier::Public, "Guides and notices anyone can read."),
        (Tier::User, "Documentation for signed-in members."),
        (
            Tier::Special,
            "Material limited to approved special members.",
        ),
    ] {
        if !can_view(session, tier) {
            continue;
        }
        let slug = tier.dir_name().unwrap_or_default();
        cards.push(format!(
            r#"<a class="tier-card" href="/docs/{slug}"><h2>{title}</h2><p>{description}</p><span class="cta">Open documents →</span></a>"#,
            slug = slug,
            title = escape_html(tier.title()),
            description = escape_html(description),
        ));
    }

    cards.push(
        r#"<a class="tier-card" href="/reviews"><h2>Reviews</h2><p>What members think of the documentation.</p><span class="cta">Read reviews →</span></a>"#
            .to_string(),
    );
    if session.authenticated {
        cards.push(
            r#"<a class="tier-card" href="/inquiries"><h2>Inquiries</h2><p>Ask a question; administrators answer.</p><span class="cta">Open inquiries →</span></a>"#
                .to_string(),
        );
        cards.push(
            r#"<a class="tier-card" href="/columns"><h2>Columns</h2><p>Longer pieces written by our special members.</p><span class="cta">Read columns →</span></a>"#
                .to_string(),
        );
    }
    let cards = cards.concat();

    let header_actions = if session.authenticated {
        let name = escape_html(session.display_name_or_empty());
        let role = session
            .role
            .map(|r| r.label())
            .unwrap_or("Member");
        format!(
            r#"<span>Signed in: <strong>{name}</strong> ({role})</span>
            <form class="logout-form" method="post" action="/logout">
                <button type="submit">Sign out</button>
            </form>"#,
        )
    } else {
        r#"<a class="login-link" href="/login">Sign in</a>"#.to_string()
    };

    let author_hint = if can_perform(session, Action::AuthorColumn) {
        r#"<p class="note">You can author columns from the Columns page.</p>"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Bluhill Documentation</title>
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="robots" content="noindex,nofollow">
    <style>
        :root {{ color-scheme: light; }}
        body {{ font-family: "Helvetica Neue", Arial, sans-serif; margin: 0; background: #f8fafc; color: #0f172a; min-height: 100vh; display: flex; flex-direction: column; }}
        header {{ background: #ffffff; padding: clamp(2rem, 4vw, 2.75rem) clamp(1.5rem, 6vw, 3rem); display: flex; flex-direction: column; gap: 1rem; border-bottom: 1px solid #e2e8f0; }}
        .header-top {{ display: flex; flex-direction: column; gap: 0.5rem; }}
        .header-top h1 {{ margin: 0; font-size: clamp(1.9rem, 3vw, 2.4rem); }}
        .header-top p {{ margin: 0; color: #64748b; }}
        .header-actions {{ display: flex; flex-wrap: wrap; align-items: center; gap: 1rem; }}
        .header-actions span {{ color: #475569; font-size: 0.95rem; }}
        .logout-form button {{ padding: 0.6rem 1.3rem; border: none; border-radius: 999px; background: #2563eb; color: #ffffff; font-weight: 600; cursor: pointer; transition: background 0.15s ease; }}
        .logout-form button:hover {{ background: #1d4ed8; }}
        .login-link {{ display: inline-flex; align-items: center; padding: 0.6rem 1.3rem; border-radius: 999px; background: #2563eb; color: #ffffff; text-decoration: none; font-weight: 600; }}
        main {{ flex: 1; padding: clamp(2rem, 5vw, 3rem); max-width: 1100px; margin: 0 auto; width: 100%; box-sizing: border-box; }}
        .flash {{ padding: 1rem 1.25rem; border-radius: 10px; margin-bottom: 1.5rem; font-weight: 600; border: 1px solid transparent; }}
        .flash.success {{ background: #ecfdf3; border-color: #bbf7d0; color: #166534; }}
        .flash.error {{ background: #fef2f2; border-color: #fecaca; color: #b91c1c; }}
        .tier-grid {{ display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); }}
        .tier-card {{ display: block; background: #ffffff; padding: 1.75rem; border-radius: 16px; text-decoration: none; color: inherit; box-shadow: 0 18px 40px rgba(15, 23, 42, 0.08); transition: transform 0.15s ease, box-shadow 0.15s ease, border 0.15s ease; border: 1px solid #e2e8f0; }}
        .tier-card:hover {{ transform: translateY(-4px); box-shadow: 0 24px 55px rgba(15, 23, 42, 0.12); border-color: #bfdbfe; }}
        .tier-card h2 {{ margin-top: 0; margin-bottom: 0.75rem; font-size: 1.25rem; }}
        .tier-card p {{ margin: 0 0 1.25rem 0; color: #475569; font-size: 0.95rem; line-height: 1.6; }}
        .tier-card .cta {{ font-weight: 600; color: #2563eb; }}
        .note {{ margin-top: 2rem; color: #475569; }}
        .app-footer {{ margin-top: 3rem; text-align: center; font-size: 0.85rem; color: #94a3b8; }}
    </style>
</head>
<body>
    <header>
        <div class="header-top">
            <h1>Bluhill Documentation</h1>
            <p>Tiered documentation, member reviews, inquiries, and columns.</p>
        </div>
        <div class="header-actions">
            {header_actions}
        </div>
    </header>
    <main>
        {flash}
        <div class="tier-grid">
            {cards}
        </div>
        {author_hint}
        {footer}
    </main>
</body>
</html>"#,
        header_actions = header_actions,
        flash = flash,
        cards = cards,
        author_hint = author_hint,
        footer = footer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;

    #[test]
    fn guest_landing_hides_gated_tiers() {
        let page = render_landing(&Session::default(), &LandingQuery::default());
        assert!(page.contains("/docs/public"));
        assert!(!page.contains("/docs/user"));
        assert!(!page.contains("/docs/special"));
        assert!(!page.contains("/inquiries"));
        assert!(page.contains("/reviews"));
        assert!(page.contains("Sign in"));
    }

    #[test]
    fn member_landing_shows_user_tier_only() {
        let mut session = Session::default();
        session.login("user1", Role::User, "First User");
        let page = render_landing(&session, &LandingQuery::default());
        assert!(page.contains("/docs/user"));
        assert!(!page.contains("/docs/special"));
        assert!(page.contains("/inquiries"));
        assert!(page.contains("Sign out"));
    }

    #[test]
    fn special_member_sees_special_tier() {
        let mut session = Session::default();
        session.login("special1", Role::Special, "Special User");
        let page = render_landing(&session, &LandingQuery::default());
        assert!(page.contains("/docs/special"));
        assert!(page.contains("author columns"));
    }

    #[test]
    fn flash_codes_render() {
        let params = LandingQuery {
            status: Some("logged_out".to_string()),
            error: None,
        };
        let page = render_landing(&Session::default(), &params);
        assert!(page.contains("You have been logged out."));
    }
}
