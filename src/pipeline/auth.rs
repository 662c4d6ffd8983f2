//! Authentication gate stage.
//!
//! # Responsibilities
//! - Require a session cookie on protected paths
//! - Send unauthenticated requests to the login page, remembering the
//!   intended destination in a `url` query parameter
//! - Bounce authenticated requests off public-only paths (login,
//!   register, ...) back to a referer-derived destination
//!
//! # Design Decisions
//! - Paths are compared without their locale prefix, so `/en/login` and
//!   `/login` gate identically
//! - The token is only checked for presence; validation happens upstream
//! - A referer carrying an encoded `url` parameter wins over the referer
//!   path itself (it is the destination the user originally wanted)

use crate::config::GatewayConfig;
use crate::i18n;
use crate::pipeline::{Decision, RequestContext};

/// Apply the auth gate to the request.
pub fn apply(ctx: &mut RequestContext, config: &GatewayConfig) -> Decision {
    let auth = &config.auth;
    if !auth.enabled {
        return Decision::Continue;
    }

    let languages = &config.i18n.languages;
    let without_locale = i18n::strip_locale_prefix(&ctx.path, languages).to_string();
    let has_token = ctx
        .cookies
        .get(&auth.cookie_name)
        .is_some_and(|token| !token.is_empty());
    let is_public = auth.public_paths.iter().any(|p| *p == without_locale);

    if !has_token && !is_public {
        let original = i18n::strip_locale_prefix(&ctx.original_path, languages);
        let mut location = auth.login_path.clone();

        if !auth.skip_return_paths.iter().any(|p| p == original) {
            let destination = ctx.with_query(ctx.original_path.clone());
            let query = url::form_urlencoded::Serializer::new(String::new())
                .append_pair("url", &destination)
                .finish();
            location = format!("{location}?{query}");
        }

        tracing::debug!(path = %ctx.original_path, "Unauthenticated, redirecting to login");
        // Cookies accumulated by earlier stages ride along on the redirect.
        return Decision::Redirect {
            location,
            cookies: std::mem::take(&mut ctx.set_cookies),
        };
    }

    if has_token && is_public {
        let location = referer_destination(ctx, config);
        tracing::debug!(path = %ctx.original_path, location = %location, "Authenticated on public-only path");
        return Decision::Redirect {
            location,
            cookies: std::mem::take(&mut ctx.set_cookies),
        };
    }

    Decision::Continue
}

/// Destination for an authenticated request that landed on a public-only
/// path: the referer's `url` parameter, else the referer's own path when it
/// is not itself public, else the root.
fn referer_destination(ctx: &RequestContext, config: &GatewayConfig) -> String {
    let Some(referer) = ctx.referer.as_deref() else {
        return "/".to_string();
    };
    let Ok(referer) = url::Url::parse(referer) else {
        return "/".to_string();
    };

    if let Some((_, destination)) = referer.query_pairs().find(|(key, _)| key == "url") {
        return destination.into_owned();
    }

    let path = referer.path();
    let without_locale = i18n::strip_locale_prefix(path, &config.i18n.languages);
    if config.auth.public_paths.iter().any(|p| p == without_locale) {
        return "/".to_string();
    }

    match referer.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderName};

    fn context(path: &str, headers: &[(&str, &str)]) -> RequestContext {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            map.insert(HeaderName::try_from(*name).unwrap(), value.parse().unwrap());
        }
        RequestContext::new(&map, path, None)
    }

    #[test]
    fn protected_path_without_token_redirects_to_login() {
        let config = GatewayConfig::default();

        let mut ctx = context("/en/grants", &[]);
        let decision = apply(&mut ctx, &config);

        assert_eq!(
            decision,
            Decision::Redirect {
                location: "/login?url=%2Fen%2Fgrants".to_string(),
                cookies: vec![],
            }
        );
    }

    #[test]
    fn destination_keeps_query_string() {
        let config = GatewayConfig::default();

        let mut ctx = context("/en/grants", &[]);
        ctx.query = Some("tab=open".to_string());
        let decision = apply(&mut ctx, &config);

        assert_eq!(
            decision,
            Decision::Redirect {
                location: "/login?url=%2Fen%2Fgrants%3Ftab%3Dopen".to_string(),
                cookies: vec![],
            }
        );
    }

    #[test]
    fn root_and_logout_are_not_remembered() {
        let config = GatewayConfig::default();

        let mut ctx = context("/", &[]);
        assert_eq!(
            apply(&mut ctx, &config),
            Decision::Redirect {
                location: "/login".to_string(),
                cookies: vec![],
            }
        );

        let mut ctx = context("/en/logout", &[]);
        assert_eq!(
            apply(&mut ctx, &config),
            Decision::Redirect {
                location: "/login".to_string(),
                cookies: vec![],
            }
        );
    }

    #[test]
    fn login_redirect_keeps_pending_locale_cookie() {
        let config = GatewayConfig::default();

        // A fallback-locale rewrite upstream in the chain queued a cookie.
        let mut ctx = context("/grants", &[]);
        ctx.path = "/sk/grants".to_string();
        ctx.set_cookies
            .push("NEXT_locale=sk; Path=/; Domain=localhost".to_string());

        assert_eq!(
            apply(&mut ctx, &config),
            Decision::Redirect {
                location: "/login?url=%2Fgrants".to_string(),
                cookies: vec!["NEXT_locale=sk; Path=/; Domain=localhost".to_string()],
            }
        );
    }

    #[test]
    fn public_path_without_token_passes() {
        let config = GatewayConfig::default();

        let mut ctx = context("/en/login", &[]);
        assert_eq!(apply(&mut ctx, &config), Decision::Continue);
    }

    #[test]
    fn protected_path_with_token_passes() {
        let config = GatewayConfig::default();

        let mut ctx = context("/en/grants", &[("cookie", "accessToken=abc")]);
        assert_eq!(apply(&mut ctx, &config), Decision::Continue);
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let config = GatewayConfig::default();

        let mut ctx = context("/en/grants", &[("cookie", "accessToken=")]);
        let decision = apply(&mut ctx, &config);
        assert!(matches!(decision, Decision::Redirect { .. }));
    }

    #[test]
    fn authenticated_on_login_follows_url_parameter() {
        let config = GatewayConfig::default();

        let mut ctx = context(
            "/en/login",
            &[
                ("cookie", "accessToken=abc"),
                ("referer", "https://conferences.flaw.uniba.sk/login?url=%2Fen%2Fgrants%2F42"),
            ],
        );

        assert_eq!(
            apply(&mut ctx, &config),
            Decision::Redirect {
                location: "/en/grants/42".to_string(),
                cookies: vec![],
            }
        );
    }

    #[test]
    fn authenticated_on_login_uses_referer_path() {
        let config = GatewayConfig::default();

        let mut ctx = context(
            "/en/login",
            &[
                ("cookie", "accessToken=abc"),
                ("referer", "https://conferences.flaw.uniba.sk/en/grants?tab=open"),
            ],
        );

        assert_eq!(
            apply(&mut ctx, &config),
            Decision::Redirect {
                location: "/en/grants?tab=open".to_string(),
                cookies: vec![],
            }
        );
    }

    #[test]
    fn public_referer_falls_back_to_root() {
        let config = GatewayConfig::default();

        let mut ctx = context(
            "/en/login",
            &[
                ("cookie", "accessToken=abc"),
                ("referer", "https://conferences.flaw.uniba.sk/en/register"),
            ],
        );

        assert_eq!(
            apply(&mut ctx, &config),
            Decision::Redirect {
                location: "/".to_string(),
                cookies: vec![],
            }
        );
    }

    #[test]
    fn missing_or_garbled_referer_falls_back_to_root() {
        let config = GatewayConfig::default();

        let mut ctx = context("/en/login", &[("cookie", "accessToken=abc")]);
        assert_eq!(
            apply(&mut ctx, &config),
            Decision::Redirect {
                location: "/".to_string(),
                cookies: vec![],
            }
        );

        let mut ctx = context(
            "/en/login",
            &[("cookie", "accessToken=abc"), ("referer", "not a url")],
        );
        assert_eq!(
            apply(&mut ctx, &config),
            Decision::Redirect {
                location: "/".to_string(),
                cookies: vec![],
            }
        );
    }

    #[test]
    fn disabled_gate_passes_everything() {
        let mut config = GatewayConfig::default();
        config.auth.enabled = false;

        let mut ctx = context("/en/grants", &[]);
        assert_eq!(apply(&mut ctx, &config), Decision::Continue);
    }
}
