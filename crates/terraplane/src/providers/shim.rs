// Preview shim for providers whose configuration is not yet known.
//
// When provider config contains unknown values, real configuration cannot
// be attempted, but the engine still needs a handle that answers its
// queries plausibly. The shim is that handle: it carries the real plugin's
// metadata but performs no side effects. The real plugin is loaded just
// long enough to copy its info out, then closed, so the shim depends on
// data rather than on a live subprocess.

use std::sync::Arc;

use semver::Version;
use tracing::warn;

use crate::config::ConfigMap;
use crate::plugin::{CheckFailure, DiffResult, Host, PluginError, PluginInfo, Provider};
use crate::resource::{Id, ModuleMember, Package, PropertyMap, Status, Urn};

/// No-op provider standing in for a real plugin during preview.
pub(crate) struct ShimProvider {
	pkg: Package,
	info: PluginInfo,
}

/// Loads the plugin for `pkg`, captures its metadata, closes it, and wraps
/// the metadata in a shim.
pub(crate) fn create_shim(
	host: &dyn Host,
	pkg: &Package,
	version: Option<&Version>,
) -> Result<Arc<dyn Provider>, PluginError> {
	let provider = host.provider(pkg, version)?;
	let info = provider.get_plugin_info();
	if let Err(err) = host.close_provider(&provider) {
		warn!("error closing provider {}; ignoring: {}", pkg, err);
	}
	let info = info?;

	Ok(Arc::new(ShimProvider {
		pkg: pkg.clone(),
		info,
	}))
}

impl Provider for ShimProvider {
	fn pkg(&self) -> Package {
		self.pkg.clone()
	}

	fn configure(&self, _config: &ConfigMap) -> Result<(), PluginError> {
		panic!("the shim provider is not configurable");
	}

	fn check_config(
		&self,
		_olds: &PropertyMap,
		news: &PropertyMap,
	) -> Result<(PropertyMap, Vec<CheckFailure>), PluginError> {
		Ok((news.clone(), Vec::new()))
	}

	fn diff_config(&self, _olds: &PropertyMap, _news: &PropertyMap) -> Result<DiffResult, PluginError> {
		// never require replacement
		Ok(DiffResult::unknown())
	}

	fn check(
		&self,
		_urn: &Urn,
		_olds: &PropertyMap,
		news: &PropertyMap,
		_allow_unknowns: bool,
	) -> Result<(PropertyMap, Vec<CheckFailure>), PluginError> {
		Ok((news.clone(), Vec::new()))
	}

	fn diff(
		&self,
		_urn: &Urn,
		_id: &Id,
		_olds: &PropertyMap,
		_news: &PropertyMap,
		_allow_unknowns: bool,
	) -> Result<DiffResult, PluginError> {
		// never require replacement
		Ok(DiffResult::unknown())
	}

	fn create(&self, _urn: &Urn, _news: &PropertyMap) -> Result<(Id, PropertyMap, Status), PluginError> {
		panic!("the shim provider cannot perform CRUD operations");
	}

	fn read(&self, _urn: &Urn, _id: &Id, _props: &PropertyMap) -> Result<PropertyMap, PluginError> {
		Ok(PropertyMap::new())
	}

	fn update(
		&self,
		_urn: &Urn,
		_id: &Id,
		_olds: &PropertyMap,
		_news: &PropertyMap,
	) -> Result<(PropertyMap, Status), PluginError> {
		panic!("the shim provider cannot perform CRUD operations");
	}

	fn delete(&self, _urn: &Urn, _id: &Id, _props: &PropertyMap) -> Result<Status, PluginError> {
		panic!("the shim provider cannot perform CRUD operations");
	}

	fn invoke(
		&self,
		_tok: &ModuleMember,
		_args: &PropertyMap,
	) -> Result<(PropertyMap, Vec<CheckFailure>), PluginError> {
		Ok((PropertyMap::new(), Vec::new()))
	}

	fn get_plugin_info(&self) -> Result<PluginInfo, PluginError> {
		Ok(self.info.clone())
	}

	fn signal_cancellation(&self) -> Result<(), PluginError> {
		Ok(())
	}

	fn close(&self) -> Result<(), PluginError> {
		Ok(())
	}
}
