//! Navigation targets shared by every front end.

use std::fmt;

/// A screen of the application, addressed by its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Signup,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "" => Some(Route::Home),
            "/login" => Some(Route::Login),
            "/signup" => Some(Route::Signup),
            "/profile" => Some(Route::Profile),
            _ => None,
        }
    }

    /// Get the display title for this route.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Login => "Login",
            Route::Signup => "Sign Up",
            Route::Profile => "Profile",
        }
    }

    /// Routes that require an authenticated session
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Profile)
    }

    /// Routes that make no sense once signed in
    pub fn is_anonymous_only(&self) -> bool {
        matches!(self, Route::Login | Route::Signup)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_round_trip() {
        for route in [Route::Home, Route::Login, Route::Signup, Route::Profile] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
    }

    #[test]
    fn test_from_path_trailing_slash_and_unknown() {
        assert_eq!(Route::from_path("/login/"), Some(Route::Login));
        assert_eq!(Route::from_path(""), Some(Route::Home));
        assert_eq!(Route::from_path("/admin"), None);
    }

    #[test]
    fn test_route_classes() {
        assert!(Route::Profile.is_protected());
        assert!(!Route::Home.is_protected());
        assert!(Route::Login.is_anonymous_only());
        assert!(Route::Signup.is_anonymous_only());
        assert!(!Route::Profile.is_anonymous_only());
    }
}
