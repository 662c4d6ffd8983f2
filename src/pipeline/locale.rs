//! Locale resolution stage.
//!
//! # Responsibilities
//! - Resolve the request locale: cookie → Accept-Language → fallback
//! - Redirect to a locale-prefixed URL when the path carries none
//! - Strip the fallback locale from URLs (it is never shown)
//! - Refresh the locale cookie on every response
//!
//! # Design Decisions
//! - The fallback locale is rewritten internally, not redirected, so the
//!   canonical URL space stays free of the default language
//! - An unsupported two-letter first segment is treated as a stale locale
//!   and replaced, preserving the remainder of the path

use crate::config::{GatewayConfig, I18nConfig};
use crate::i18n;
use crate::pipeline::{Decision, RequestContext};

/// Resolve the request locale from cookie, header, or fallback.
pub fn resolve(ctx: &RequestContext, i18n: &I18nConfig) -> String {
    ctx.cookies
        .get(&i18n.cookie_name)
        .and_then(|value| i18n::match_tag(value, &i18n.languages))
        .or_else(|| {
            ctx.accept_language
                .as_deref()
                .and_then(|header| i18n::negotiate(header, &i18n.languages, &i18n.fallback))
        })
        .unwrap_or_else(|| i18n.fallback.clone())
}

fn locale_cookie(i18n: &I18nConfig, locale: &str) -> String {
    format!(
        "{}={}; Path=/; Domain={}",
        i18n.cookie_name, locale, i18n.cookie_domain
    )
}

/// Apply the locale stage to the request.
pub fn apply(ctx: &mut RequestContext, config: &GatewayConfig) -> Decision {
    let i18n_cfg = &config.i18n;
    let path = ctx.path.clone();

    let Some(locale) = i18n::path_locale(&path, &i18n_cfg.languages).map(str::to_string) else {
        let resolved = resolve(ctx, i18n_cfg);

        if i18n::looks_like_locale_segment(&path) {
            // Unsupported locale in the path: replace it and redirect.
            let segment = i18n::first_segment(&path);
            let rest = &path[1 + segment.len()..];
            let location = ctx.with_query(format!("/{resolved}{rest}"));
            tracing::debug!(path = %path, locale = %resolved, "Replacing unsupported locale segment");
            return Decision::Redirect {
                location,
                cookies: Vec::new(),
            };
        }

        if resolved != i18n_cfg.fallback {
            // Non-default locale missing from the path: redirect to it.
            let location = ctx.with_query(format!("/{resolved}{path}"));
            return Decision::Redirect {
                location,
                cookies: Vec::new(),
            };
        }

        // Fallback locale: rewrite internally, keep the URL bare.
        ctx.path = format!("/{}{}", i18n_cfg.fallback, path);
        ctx.locale = Some(i18n_cfg.fallback.clone());
        ctx.set_cookies.push(locale_cookie(i18n_cfg, &i18n_cfg.fallback));
        return Decision::Continue;
    };

    if locale == i18n_cfg.fallback {
        // Default locale is never shown in the URL.
        let stripped = i18n::strip_locale_prefix(&path, &i18n_cfg.languages).to_string();
        let location = ctx.with_query(stripped);
        return Decision::Redirect {
            location,
            cookies: vec![locale_cookie(i18n_cfg, &i18n_cfg.fallback)],
        };
    }

    ctx.locale = Some(locale.clone());
    ctx.set_cookies.push(locale_cookie(i18n_cfg, &locale));
    Decision::Continue
}
