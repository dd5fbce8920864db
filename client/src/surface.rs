use async_trait::async_trait;
use js_sys::{Array, Function, Promise, Reflect, JSON};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use inkpad_engine::{decode_export, CanvasSurface, PathRecord, SurfaceError};

/// The page's drawing library, reached through its `exportPaths`,
/// `loadPaths` and `clearCanvas` methods. Each may return a value or a
/// promise.
pub struct JsSurface {
    target: JsValue,
}

impl JsSurface {
    pub fn new(target: JsValue) -> Result<Self, JsValue> {
        for name in ["exportPaths", "loadPaths", "clearCanvas"] {
            let method = Reflect::get(&target, &JsValue::from_str(name))?;
            if !method.is_function() {
                return Err(JsValue::from_str(&format!("surface is missing {name}()")));
            }
        }
        Ok(Self { target })
    }

    async fn call(&self, name: &str, args: &Array) -> Result<JsValue, String> {
        let method = Reflect::get(&self.target, &JsValue::from_str(name))
            .map_err(describe)?
            .dyn_into::<Function>()
            .map_err(|_| format!("{name} is not a function"))?;
        let result = method.apply(&self.target, args).map_err(describe)?;
        JsFuture::from(Promise::resolve(&result))
            .await
            .map_err(describe)
    }
}

fn describe(value: JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    JSON::stringify(&value)
        .ok()
        .and_then(|text| text.as_string())
        .unwrap_or_else(|| format!("{value:?}"))
}

#[async_trait(?Send)]
impl CanvasSurface for JsSurface {
    async fn export_paths(&self) -> Result<Vec<PathRecord>, SurfaceError> {
        let value = self
            .call("exportPaths", &Array::new())
            .await
            .map_err(SurfaceError::Export)?;
        let text = JSON::stringify(&value)
            .ok()
            .and_then(|text| text.as_string())
            .ok_or_else(|| SurfaceError::Decode("exportPaths returned no JSON value".into()))?;
        let json = serde_json::from_str(&text).map_err(|e| SurfaceError::Decode(e.to_string()))?;
        decode_export(json)
    }

    async fn load_paths(&self, paths: &[PathRecord]) -> Result<(), SurfaceError> {
        let text = serde_json::to_string(paths).map_err(|e| SurfaceError::Load(e.to_string()))?;
        let value = JSON::parse(&text).map_err(|e| SurfaceError::Load(describe(e)))?;
        self.call("loadPaths", &Array::of1(&value))
            .await
            .map_err(SurfaceError::Load)?;
        Ok(())
    }

    async fn clear_canvas(&self) -> Result<(), SurfaceError> {
        self.call("clearCanvas", &Array::new())
            .await
            .map_err(SurfaceError::Clear)?;
        Ok(())
    }
}
