//! CORS policy presets and header emission.
//!
//! Presets start with an empty origin allow-list; deployments add their own origins through
//! [`CorsPolicy::with_origin`], which validates them as absolute URLs. Without at least one
//! origin no `Access-Control-Allow-Origin` header is emitted, which keeps the default posture
//! closed.

// self
use crate::_prelude::*;

/// Error raised while configuring a CORS policy.
#[derive(Debug, ThisError)]
pub enum CorsError {
	/// The origin is not a parseable absolute URL.
	#[error("CORS origin is not a valid URL.")]
	InvalidOrigin {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Named policy presets mirroring common deployment shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CorsPreset {
	/// Public read-only APIs.
	Public,
	/// Local development frontend.
	Dev,
	/// Authenticated routes with cookies.
	Auth,
	/// Admin dashboard.
	Admin,
	/// External partner integration.
	Partner,
	/// Trusted CDN assets.
	Cdn,
	/// Secure same-origin file uploads.
	Upload,
	/// Developer playground (GraphQL, Swagger).
	Playground,
	/// Customer support tools.
	Support,
	/// Internal microservices.
	Internal,
}

/// Cross-origin resource sharing policy applied to outgoing responses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsPolicy {
	/// Explicit origin allow-list.
	pub allow_origins: Vec<Url>,
	/// Allowed methods; `*` for any.
	pub allow_methods: Vec<String>,
	/// Allowed request headers; `*` for any.
	pub allow_headers: Vec<String>,
	/// Response headers exposed to the caller.
	pub expose_headers: Vec<String>,
	/// Whether credentialed requests are allowed.
	pub allow_credentials: bool,
	/// Preflight cache lifetime.
	pub max_age: Option<Duration>,
}
impl CorsPolicy {
	/// Builds the policy associated with a preset.
	pub fn preset(preset: CorsPreset) -> Self {
		let build = |methods: &[&str], headers: &[&str], credentials: bool, max_age: Option<i64>| {
			Self {
				allow_origins: Vec::new(),
				allow_methods: methods.iter().map(|s| (*s).to_owned()).collect(),
				allow_headers: headers.iter().map(|s| (*s).to_owned()).collect(),
				expose_headers: Vec::new(),
				allow_credentials: credentials,
				max_age: max_age.map(Duration::seconds),
			}
		};

		match preset {
			CorsPreset::Public => build(&["GET"], &["*"], false, None),
			CorsPreset::Dev => build(&["*"], &["*"], true, None),
			CorsPreset::Auth => build(&["POST"], &["Authorization", "Content-Type"], true, None),
			CorsPreset::Admin => build(
				&["GET", "POST", "PUT", "DELETE"],
				&["Authorization", "Content-Type"],
				true,
				Some(600),
			),
			CorsPreset::Partner =>
				build(&["GET", "POST"], &["Authorization", "X-Custom-Header"], true, None),
			CorsPreset::Cdn => build(&["GET"], &["*"], false, Some(3600)),
			CorsPreset::Upload => build(&["POST"], &["Authorization", "Content-Type"], true, None),
			CorsPreset::Playground => build(&["GET", "POST", "OPTIONS"], &["*"], false, None),
			CorsPreset::Support =>
				build(&["GET", "POST"], &["Authorization", "Content-Type"], true, None),
			CorsPreset::Internal => build(&["*"], &["*"], true, None),
		}
	}

	/// Adds a validated origin to the allow-list.
	pub fn with_origin(mut self, origin: impl AsRef<str>) -> Result<Self, CorsError> {
		let url =
			Url::parse(origin.as_ref()).map_err(|source| CorsError::InvalidOrigin { source })?;

		self.allow_origins.push(url);

		Ok(self)
	}

	/// Adds a response header exposed to the caller.
	pub fn with_exposed_header(mut self, header: impl Into<String>) -> Self {
		self.expose_headers.push(header.into());

		self
	}

	/// Computes the response header pairs this policy emits.
	pub fn response_headers(&self) -> Vec<(&'static str, String)> {
		let mut headers = Vec::new();
		let join = |values: &[String]| values.join(",");

		if !self.allow_origins.is_empty() {
			let origins = self
				.allow_origins
				.iter()
				.map(|url| url.origin().ascii_serialization())
				.collect::<Vec<_>>()
				.join(",");

			headers.push(("access-control-allow-origin", origins));
		}
		if !self.allow_methods.is_empty() {
			headers.push(("access-control-allow-methods", join(&self.allow_methods)));
		}
		if !self.allow_headers.is_empty() {
			headers.push(("access-control-allow-headers", join(&self.allow_headers)));
		}
		if self.allow_credentials {
			headers.push(("access-control-allow-credentials", "true".to_owned()));
		}
		if !self.expose_headers.is_empty() {
			headers.push(("access-control-expose-headers", join(&self.expose_headers)));
		}
		if let Some(max_age) = self.max_age {
			headers.push(("access-control-max-age", max_age.whole_seconds().to_string()));
		}

		headers
	}
}
