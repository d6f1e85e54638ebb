use url::Url;

/// The scheme + host + port boundary a crawl is confined to
///
/// Two URLs share an origin when their scheme, host and effective port are
/// all equal. Opaque origins (non-HTTP schemes) never compare equal to
/// anything, so they are not representable here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin(url::Origin);

impl Origin {
    /// Returns the origin of a URL, or None if it is opaque
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use forum_ripple::url::Origin;
    ///
    /// let a = Origin::of(&Url::parse("https://forum.example/thread-1-1-1.html").unwrap());
    /// let b = Origin::of(&Url::parse("https://FORUM.example:443/other").unwrap());
    /// assert_eq!(a, b);
    /// ```
    pub fn of(url: &Url) -> Option<Self> {
        let origin = url.origin();
        origin.is_tuple().then_some(Self(origin))
    }

    /// Returns true if the URL belongs to this origin
    pub fn contains(&self, url: &Url) -> bool {
        url.origin() == self.0
    }

    /// Serializes the origin as `scheme://host[:port]`
    pub fn as_string(&self) -> String {
        self.0.ascii_serialization()
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_string())
    }
}
