//! SVG card template.
//!
//! Layout is fixed; only text content and the avatar reference vary.

use std::borrow::Cow;

use crate::models::ProfileCard;

pub const CARD_WIDTH: u32 = 750;
pub const CARD_HEIGHT: u32 = 260;

/// Escapes `& < > " '` for use in SVG text nodes and attribute values.
pub fn escape_markup(input: &str) -> Cow<'_, str> {
    if !input.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len() + 16);
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

pub fn render_card(card: &ProfileCard) -> String {
    let name = escape_markup(&card.display_name);
    let bio = escape_markup(&card.bio);
    let avatar = escape_markup(&card.avatar);

    format!(
        r##"<svg width="{width}" height="{height}" viewBox="0 0 {width} {height}" xmlns="http://www.w3.org/2000/svg">
  <defs>
    <linearGradient id="grad" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:#74dcc4;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#4597e9;stop-opacity:1" />
    </linearGradient>
    <filter id="shadow" x="-20%" y="-20%" width="140%" height="140%">
      <feDropShadow dx="0" dy="5" stdDeviation="10" flood-color="rgba(0,0,0,0.3)"/>
    </filter>
    <clipPath id="avatar-clip">
      <circle cx="90" cy="100" r="60" />
    </clipPath>
  </defs>

  <rect x="10" y="10" rx="20" ry="20" width="730" height="240" fill="url(#grad)" filter="url(#shadow)" />

  <circle cx="90" cy="100" r="64" fill="#ffffff" />
  <image href="{avatar}" x="30" y="40" width="120" height="120" clip-path="url(#avatar-clip)" preserveAspectRatio="xMidYMid slice" />

  <text x="180" y="80" font-size="28" fill="white" font-family="Fira Code" font-weight="bold">{name}</text>
  <text x="180" y="115" font-size="16" fill="white" font-family="Fira Code">{bio}</text>

  <g font-family="Fira Code" fill="white" font-weight="bold">
    <rect x="180" y="135" width="120" height="44" rx="10" ry="10" fill="rgba(255,255,255,0.2)" />
    <text x="190" y="163" font-size="16">Repos: {repos}</text>

    <rect x="310" y="135" width="120" height="44" rx="10" ry="10" fill="rgba(255,255,255,0.2)" />
    <text x="320" y="163" font-size="16">Stars: {stars}</text>

    <rect x="440" y="135" width="150" height="44" rx="10" ry="10" fill="rgba(255,255,255,0.2)" />
    <text x="450" y="163" font-size="16">Followers: {followers}</text>

    <rect x="180" y="190" width="160" height="44" rx="10" ry="10" fill="rgba(255,255,255,0.2)" />
    <text x="190" y="218" font-size="16">Contribs: {contribs}</text>

    <rect x="350" y="190" width="240" height="44" rx="10" ry="10" fill="rgba(255,255,255,0.2)" />
    <text x="360" y="218" font-size="16">Pinned Projects: {pinned}</text>
  </g>
</svg>
"##,
        width = CARD_WIDTH,
        height = CARD_HEIGHT,
        avatar = avatar,
        name = name,
        bio = bio,
        repos = card.repo_count,
        stars = card.star_total,
        followers = card.follower_count,
        contribs = card.contribution_estimate,
        pinned = card.pinned_count,
    )
}
