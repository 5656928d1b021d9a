use crate::PatternRule;
use once_cell::sync::Lazy;
use regex::Regex;
use simple_fs::SPath;

/// Relative path of the script bundle inside the unpacked application.
///
/// The built-in rules are tightly coupled to the exact minified structure of
/// this file in the targeted application version. A version bump with a
/// different minification makes the patterns stop matching, which surfaces as
/// `PatternNotFound` rather than a silent corruption.
pub const DEFAULT_BUNDLE_PATH: &str = "src/main/static/main.bundle.js";

/// Default directory holding `<feature>.diff` patch files.
pub const DEFAULT_PATCHES_DIR: &str = "patches";

/// Canonical replacement public key for the `serverless` rule. Also the
/// already-patched marker, since its presence in the bundle proves the swap
/// happened.
pub const SERVERLESS_PUBLIC_KEY: &str = "LS0tLS1CRUdJTiBQVUJMSUMgS0VZLS0tLS0NCk1JSUJJakFOQmdrcWhraUc5dzBCQVFFRkFBT0NBUThBTUlJQkNnS0NBUUVBdWdxakJYYXJYa3oxcG5kM0NxeG0NCkFSMTRINnBNZ05FRVF5a2tsaCtzRXY3bmdYZHNvZXV6TDB6WXhOZ2l5ZC94TFJnZ2Z5NUh0QlloRmxXa0hucHENCmluL2E5c0YxMUtSQkdxZnE1L1ZxRlliQVRPVjZkQ09YV1BONjhwVi9IeWpGeXBQNGQ5M2UveURGM0tBU093S20NCjkrS1A5N001RFJtTTVsWlJBOUZnUmFQQzhVMXhGajE0OFM4ZTFzOEYwcytPNEU0T1h5eTZxUG5iY3lqSFdIRFkNCjVFTzYyNVVQZW9iOE9tVXBETlpiTGRMR2ZobUlrU1hZeERqZEh3WFVQNm5IUlBQdmZjazhQOFhjaSs4bW1FVGYNCkZ4WWlNQVRzdElWU2VMVndtTDdhblNoai9IK3pCTUhDVlV6K3hPSVVMN3Z3eGR1dDJZNGxmTlhvemxkZ0g0ZjANCmRRSURBUUFCDQotLS0tLUVORCBQVUJMSUMgS0VZLS0tLS0=";

/// Already-patched marker for the `pro` rule: the guard clause the rewrite
/// injects into the license-decode path.
pub const PRO_MARKER: &str =
	r#"(delete json.proAccessState,delete json.licenseExpiresAt,json={...json,licensedFeatures:["pro"]});"#;

// The public-key constant assignment in the minified bundle:
// `const x="LS0tLS1CRUdJTi...",`. Group 1 keeps the declaration, group 2 the
// trailing comma; only the quoted payload gets swapped.
static RE_SERVERLESS: Lazy<Regex> =
	Lazy::new(|| Regex::new(r#"(const [^=]*=)"LS0tLS1CRUdJTi[\w+/=]+"(,)"#).unwrap());

// The license-decode return in the minified bundle. The `const ...="dev"===...;`
// prefix anchors the match (the regex crate has no lookbehind, so group 1
// captures it and the rewrite re-emits it). Group 2 is the decoded-JSON
// expression.
static RE_PRO: Lazy<Regex> = Lazy::new(|| {
	Regex::new(concat!(
		r#"(const [^=]*="dev"===[^?]*\?"[\w+/=]+":"[\w+/=]+";)"#,
		r#"return (JSON\.parse\(\([^;]*?\)\(Buffer\.from\([^;]*?,"base64"\)\.toString\("utf8"\),"#,
		r#"Buffer\.from\([^;]*?\.secure,"base64"\)\)\.toString\("utf8"\)\))\};"#,
	))
	.unwrap()
});

/// The built-in text-patch rules, in dispatch order.
pub fn builtin_rules() -> Vec<PatternRule> {
	vec![serverless_rule(), pro_rule()]
}

/// `serverless`: swaps the bundle's embedded license public key for the
/// canonical replacement key.
fn serverless_rule() -> PatternRule {
	PatternRule {
		feature: "serverless".to_string(),
		search: RE_SERVERLESS.clone(),
		rewrite: ["${1}\"", SERVERLESS_PUBLIC_KEY, "\"${2}"].concat(),
		marker: SERVERLESS_PUBLIC_KEY.to_string(),
	}
}

/// `pro`: rewrites the license-decode return so the decoded profile always
/// carries `licensedFeatures:["pro"]`.
fn pro_rule() -> PatternRule {
	PatternRule {
		feature: "pro".to_string(),
		search: RE_PRO.clone(),
		rewrite: [
			"${1}var json=${2};",
			r#"("licenseExpiresAt"in json||"licensedFeatures"in json)&&"#,
			PRO_MARKER,
			"return json};",
		]
		.concat(),
		marker: PRO_MARKER.to_string(),
	}
}

// region:    --- PatchConfig

/// Injected configuration for the orchestrator: where the bundle lives inside
/// the unpacked app, where `<feature>.diff` files live, and which text rules
/// are registered. Defaults carry the built-in rules; tests swap in synthetic
/// ones.
#[derive(Debug, Clone)]
pub struct PatchConfig {
	/// Bundle path relative to the unpacked app directory.
	pub bundle_path: String,
	/// Directory holding `<feature>.diff` files.
	pub patches_dir: SPath,
	/// Registered text-patch rules, matched by feature identifier.
	pub rules: Vec<PatternRule>,
}

impl Default for PatchConfig {
	fn default() -> Self {
		Self {
			bundle_path: DEFAULT_BUNDLE_PATH.to_string(),
			patches_dir: SPath::new(DEFAULT_PATCHES_DIR),
			rules: builtin_rules(),
		}
	}
}

impl PatchConfig {
	pub fn rule_for(&self, feature: &str) -> Option<&PatternRule> {
		self.rules.iter().find(|rule| rule.feature == feature)
	}
}

// endregion: --- PatchConfig
