//! Route table and the guard deciding what a route renders.
//!
//! The guard is a pure function of the current [`AuthSnapshot`] and the
//! requested [`Route`]; it never performs I/O and never waits.

use std::fmt;

use crate::domain::catalog::ResourceId;
use crate::domain::session::{AuthPhase, AuthSnapshot};

/// Whether a route needs a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Reachable without signing in.
    Public,
    /// Requires an authenticated session.
    Protected,
}

/// Every location the portal knows how to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Login,
    /// `/sign-up`
    SignUp,
    /// `/reset-password`
    ResetPassword,
    /// `/characters`
    Characters,
    /// `/characters/:id`
    CharacterDetail(ResourceId),
    /// `/location/:id`
    LocationDetail(ResourceId),
    /// `/episode/:id`
    EpisodeDetail(ResourceId),
    /// Anything else.
    Unknown(String),
}

impl Route {
    /// Parse a URL path into a route.
    ///
    /// Trailing slashes are ignored. Detail routes need exactly one
    /// non-empty id segment; anything else is [`Route::Unknown`].
    ///
    /// # Examples
    /// ```
    /// use portal::domain::Route;
    ///
    /// assert_eq!(Route::parse("/characters/"), Route::Characters);
    /// assert!(matches!(Route::parse("/episode/"), Route::Unknown(_)));
    /// ```
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };
        match segments.as_slice() {
            [] => Self::Login,
            ["sign-up"] => Self::SignUp,
            ["reset-password"] => Self::ResetPassword,
            ["characters"] => Self::Characters,
            ["characters", id] => detail(id, path, Self::CharacterDetail),
            ["location", id] => detail(id, path, Self::LocationDetail),
            ["episode", id] => detail(id, path, Self::EpisodeDetail),
            _ => Self::Unknown(path.to_owned()),
        }
    }

    /// Whether the route needs a signed-in user.
    ///
    /// Unknown routes have no class; the guard redirects them.
    #[must_use]
    pub const fn class(&self) -> Option<RouteClass> {
        match self {
            Self::Login | Self::SignUp | Self::ResetPassword => Some(RouteClass::Public),
            Self::Characters
            | Self::CharacterDetail(_)
            | Self::LocationDetail(_)
            | Self::EpisodeDetail(_) => Some(RouteClass::Protected),
            Self::Unknown(_) => None,
        }
    }

    /// Return `true` for routes reachable without signing in.
    #[must_use]
    pub const fn is_public(&self) -> bool {
        matches!(self.class(), Some(RouteClass::Public))
    }

    /// Canonical path for the route.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Login => "/".to_owned(),
            Self::SignUp => "/sign-up".to_owned(),
            Self::ResetPassword => "/reset-password".to_owned(),
            Self::Characters => "/characters".to_owned(),
            Self::CharacterDetail(id) => format!("/characters/{id}"),
            Self::LocationDetail(id) => format!("/location/{id}"),
            Self::EpisodeDetail(id) => format!("/episode/{id}"),
            Self::Unknown(raw) => raw.clone(),
        }
    }
}

fn detail(id: &str, raw: &str, build: fn(ResourceId) -> Route) -> Route {
    ResourceId::new(id).map_or_else(|_| Route::Unknown(raw.to_owned()), build)
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// What the shell should do with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Auth state is still unknown; show a neutral placeholder.
    Placeholder,
    /// Navigate to the contained route instead.
    Redirect(Route),
    /// Render the requested route.
    Render(Route),
}

/// Decide whether `route` renders for the given auth snapshot.
///
/// # Examples
/// ```
/// use portal::domain::{AuthSnapshot, GuardDecision, Route, Session, guard};
///
/// let anonymous = AuthSnapshot::ready(Session::Anonymous);
/// assert_eq!(
///     guard(&anonymous, &Route::Characters),
///     GuardDecision::Redirect(Route::Login),
/// );
/// assert_eq!(guard(&AuthSnapshot::default(), &Route::Login), GuardDecision::Placeholder);
/// ```
#[must_use]
pub fn guard(snapshot: &AuthSnapshot, route: &Route) -> GuardDecision {
    if snapshot.phase == AuthPhase::Loading {
        return GuardDecision::Placeholder;
    }
    match route.class() {
        None => GuardDecision::Redirect(Route::Login),
        Some(RouteClass::Protected) if !snapshot.session.is_authenticated() => {
            GuardDecision::Redirect(Route::Login)
        }
        Some(_) => GuardDecision::Render(route.clone()),
    }
}

/// Whether the navigation chrome is shown for `route`.
///
/// Only signed-in users outside the public routes see it.
#[must_use]
pub fn show_navigation(snapshot: &AuthSnapshot, route: &Route) -> bool {
    snapshot.session.is_authenticated() && !route.is_public()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::session::{AuthenticatedUser, Session, UserId};
    use rstest::{fixture, rstest};

    fn id(value: &str) -> ResourceId {
        ResourceId::new(value).expect("valid id")
    }

    #[fixture]
    fn signed_in() -> AuthSnapshot {
        AuthSnapshot::ready(Session::Authenticated(AuthenticatedUser {
            user_id: UserId::new("uid-1").expect("valid user id"),
            email: "morty@smith.test".to_owned(),
            email_verified: true,
        }))
    }

    #[fixture]
    fn anonymous() -> AuthSnapshot {
        AuthSnapshot::ready(Session::Anonymous)
    }

    #[rstest]
    #[case("/", Route::Login)]
    #[case("", Route::Login)]
    #[case("/sign-up", Route::SignUp)]
    #[case("/reset-password/", Route::ResetPassword)]
    #[case("/characters", Route::Characters)]
    #[case("/characters/42", Route::CharacterDetail(id("42")))]
    #[case("/characters/42/", Route::CharacterDetail(id("42")))]
    #[case("/location/3", Route::LocationDetail(id("3")))]
    #[case("/episode/28", Route::EpisodeDetail(id("28")))]
    fn parses_known_routes(#[case] path: &str, #[case] expected: Route) {
        assert_eq!(Route::parse(path), expected);
    }

    #[rstest]
    #[case("/nowhere")]
    #[case("/episode")]
    #[case("/characters/1/2")]
    #[case("/characters/ ")]
    #[case("/characters//7")]
    #[case("/location/1,2")]
    fn other_paths_are_unknown(#[case] path: &str) {
        assert_eq!(Route::parse(path), Route::Unknown(path.to_owned()));
    }

    #[rstest]
    #[case(Route::Login)]
    #[case(Route::Characters)]
    #[case(Route::EpisodeDetail(id("7")))]
    fn canonical_paths_parse_back(#[case] route: Route) {
        assert_eq!(Route::parse(&route.path()), route);
    }

    #[rstest]
    #[case(Route::Login)]
    #[case(Route::Characters)]
    #[case(Route::Unknown("/nope".to_owned()))]
    fn loading_always_shows_placeholder(#[case] route: Route) {
        assert_eq!(
            guard(&AuthSnapshot::default(), &route),
            GuardDecision::Placeholder
        );
    }

    #[rstest]
    fn anonymous_users_are_redirected_from_protected_routes(anonymous: AuthSnapshot) {
        let route = Route::CharacterDetail(id("1"));
        assert_eq!(
            guard(&anonymous, &route),
            GuardDecision::Redirect(Route::Login)
        );
    }

    #[rstest]
    fn signed_in_users_reach_protected_routes(signed_in: AuthSnapshot) {
        let route = Route::LocationDetail(id("20"));
        assert_eq!(guard(&signed_in, &route), GuardDecision::Render(route));
    }

    #[rstest]
    fn public_routes_render_for_everyone(signed_in: AuthSnapshot, anonymous: AuthSnapshot) {
        for snapshot in [signed_in, anonymous] {
            assert_eq!(
                guard(&snapshot, &Route::SignUp),
                GuardDecision::Render(Route::SignUp)
            );
        }
    }

    #[rstest]
    fn unknown_routes_redirect_to_login(signed_in: AuthSnapshot) {
        let route = Route::parse("/admin");
        assert_eq!(
            guard(&signed_in, &route),
            GuardDecision::Redirect(Route::Login)
        );
    }

    #[rstest]
    fn navigation_needs_a_user_and_a_private_route(
        signed_in: AuthSnapshot,
        anonymous: AuthSnapshot,
    ) {
        assert!(show_navigation(&signed_in, &Route::Characters));
        assert!(!show_navigation(&signed_in, &Route::Login));
        assert!(!show_navigation(&anonymous, &Route::Characters));
    }
}
