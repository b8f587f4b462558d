use actix_web::middleware::DefaultHeaders;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LIKE_WILDCARDS: Regex = Regex::new(r"([\\%_])").unwrap();
}

/// Escapes `%`, `_` and `\` so user input matches literally inside a `LIKE` pattern.
///
/// Queries bind the result as a parameter; this only neutralises wildcard semantics.
pub fn escape_like(input: &str) -> String {
    LIKE_WILDCARDS.replace_all(input, r"\$1").into_owned()
}

/// Hardening headers added to every response.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
        .add(("X-DNS-Prefetch-Control", "off"))
}
