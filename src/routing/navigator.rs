use tokio::sync::watch;

pub const LOGIN_PATH: &str = "/login";
pub const FORBIDDEN_PATH: &str = "/forbidden";

/// Where the portal is, plus the path a redirect interrupted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub from: Option<String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            from: None,
        }
    }

    pub fn login(from: Option<&str>) -> Self {
        Self {
            path: LOGIN_PATH.to_string(),
            from: from.map(str::to_string),
        }
    }

    pub fn forbidden(from: Option<&str>) -> Self {
        Self {
            path: FORBIDDEN_PATH.to_string(),
            from: from.map(str::to_string),
        }
    }
}

/// Current location of the portal, observable by anything holding a receiver.
pub struct Navigator {
    location: watch::Sender<Location>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        let (location, _) = watch::channel(Location::new("/"));
        Self { location }
    }

    pub fn navigate(&self, to: Location) {
        tracing::info!(path = %to.path, from = ?to.from, "navigating");
        self.location.send_replace(to);
    }

    pub fn current(&self) -> Location {
        self.location.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Location> {
        self.location.subscribe()
    }

    /// Where to go after a successful login: the interrupted path, if any.
    pub fn after_login(&self) -> Location {
        match self.current() {
            Location {
                from: Some(from), ..
            } => Location::new(from),
            _ => Location::new("/"),
        }
    }
}
