//! Shared fixtures for pipeline tests

use dai_schema::{
	shape::{record_from_value, OpenShape, Record, ShapeSet, GLOBAL_PROPERTIES_SHAPE},
	Catalog, CatalogConfig, CatalogSources,
};
use dai_util::logging::LoggingPreset;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalProperties {
	pub pipeline_name: String,
	pub pipeline_version: String,
	pub leon_os_frequency_khz: u64,
	pub leon_rt_frequency_khz: u64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XLinkOutProperties {
	pub stream_name: String,
	#[serde(default)]
	pub max_fps_limit: f64,
}

/// Send logs to the test harness.
/// Safe to call more than once.
pub fn init_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_env_filter(EnvFilter::from(LoggingPreset::Develop.get_config()))
		.try_init();
}

pub fn record(value: Value) -> Record {
	record_from_value(value).unwrap()
}

fn sources() -> CatalogSources {
	let hierarchy = json!({
		"hierarchies": [
			{
				"datatype": "Buffer",
				"children": [
					{ "datatype": "ImgFrame", "children": [{ "datatype": "NNData" }] },
					{ "datatype": "CameraControl" }
				]
			},
			{ "datatype": "IMUData" }
		]
	});

	let descriptors = [
		json!({
			"name": "XLinkIn",
			"properties": "XLinkIn.json",
			"outputs": [{ "name": "out", "type": "MSender", "possibleDatatypes": [{ "datatype": "Buffer" }] }]
		}),
		json!({
			"name": "XLinkOut",
			"properties": "XLinkOut.json",
			"inputs": [{ "name": "in", "type": "SReceiver", "acceptedDatatypes": [{ "datatype": "Buffer" }] }]
		}),
		json!({
			"name": "MyProducer",
			"properties": "MyProducer.json",
			"outputs": [{
				"name": "out",
				"type": "MSender",
				"possibleDatatypes": [{ "datatype": "Buffer" }, { "datatype": "RawStereoDepth" }]
			}]
		}),
		json!({
			"name": "Source",
			"properties": "Source.json",
			"outputs": [{ "name": "out", "possibleDatatypes": [{ "datatype": "ImgFrame" }] }]
		}),
		json!({
			"name": "Sink",
			"properties": "Sink.json",
			"inputs": [{ "name": "in", "acceptedDatatypes": [{ "datatype": "NNData" }] }]
		}),
		json!({
			"name": "Imu",
			"properties": "Imu.json",
			"outputs": [{
				"name": "out",
				"possibleDatatypes": [{ "datatype": "IMUData" }, { "datatype": "RawImuPacket" }]
			}]
		}),
	]
	.map(|d| d.to_string());

	CatalogSources::from_json_strs(&hierarchy.to_string(), descriptors.iter().map(|d| d.as_str()))
		.unwrap()
}

fn node_shapes() -> ShapeSet {
	ShapeSet::new()
		.with_shape("XLinkInProperties", OpenShape)
		.with::<XLinkOutProperties>("XLinkOutProperties")
		.with_shape("MyProducerProperties", OpenShape)
		.with_shape("SourceProperties", OpenShape)
		.with_shape("SinkProperties", OpenShape)
		.with_shape("ImuProperties", OpenShape)
}

/// A catalog that accepts any global properties
pub fn open_catalog() -> Arc<Catalog> {
	init_logging();
	let shapes = node_shapes().with_shape(GLOBAL_PROPERTIES_SHAPE, OpenShape);
	Arc::new(Catalog::initialize(&sources(), &shapes, &CatalogConfig::default()).unwrap())
}

/// A catalog whose global properties must fit [`GlobalProperties`]
pub fn typed_catalog() -> Arc<Catalog> {
	init_logging();
	let shapes = node_shapes().with::<GlobalProperties>(GLOBAL_PROPERTIES_SHAPE);
	Arc::new(Catalog::initialize(&sources(), &shapes, &CatalogConfig::default()).unwrap())
}
