//! Process-wide cache of codec instances keyed by shape and dialect.
//!
//! Entries are only ever added. Two threads may build the same codec at the
//! same time; construction is pure, so the loser's instance is dropped and
//! both callers get the one that was inserted first.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use log::debug;

use crate::codec::KindCodec;
use crate::types::{ArrayValue, Decoded, Element, Shape};
use crate::{decode, encode, DecodeOptions, Dialect, EncodeOptions, Result};

/// Codec for one shape in one dialect.
#[derive(Debug, Clone)]
pub struct ArrayCodec {
    shape: Shape,
    dialect: Dialect,
    element: KindCodec,
    decode_options: DecodeOptions,
    encode_options: EncodeOptions,
}

impl ArrayCodec {
    pub fn new(shape: Shape, dialect: Dialect) -> Self {
        Self::with_element(shape, dialect, KindCodec::new(shape.kind))
    }

    pub fn with_element(shape: Shape, dialect: Dialect, element: KindCodec) -> Self {
        Self {
            shape,
            dialect,
            element,
            decode_options: DecodeOptions::for_dialect(dialect, shape.kind),
            encode_options: EncodeOptions::for_dialect(dialect, shape.kind),
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn element(&self) -> &KindCodec {
        &self.element
    }

    pub fn decode_options(&self) -> &DecodeOptions {
        &self.decode_options
    }

    pub fn encode_options(&self) -> &EncodeOptions {
        &self.encode_options
    }

    pub fn decode(&self, text: &str) -> Result<ArrayValue<Element>> {
        decode::from_str(text, self.shape.dimension, &self.element, &self.decode_options)
    }

    /// Decode with `non_null` overriding the shape's default.
    pub fn decode_non_null(&self, text: &str) -> Result<ArrayValue<Element>> {
        let options = self.decode_options.clone().with_non_null(true);
        decode::from_str(text, self.shape.dimension, &self.element, &options)
    }

    pub fn decode_with_bounds(&self, text: &str) -> Result<Decoded<Element>> {
        decode::decode_with_bounds(text, self.shape.dimension, &self.element, &self.decode_options)
    }

    pub fn encode(&self, value: &ArrayValue<Element>) -> Result<String> {
        encode::to_string(value, self.shape.dimension, &self.element, &self.encode_options)
    }

    pub fn encode_list(&self, items: &[ArrayValue<Element>]) -> Result<String> {
        encode::list_to_string(items, self.shape.dimension, &self.element, &self.encode_options)
    }
}

type RegistryKey = (Shape, Dialect);

#[derive(Debug, Default)]
pub struct ShapeRegistry {
    codecs: RwLock<HashMap<RegistryKey, Arc<ArrayCodec>>>,
}

impl ShapeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global() -> &'static ShapeRegistry {
        static REGISTRY: OnceLock<ShapeRegistry> = OnceLock::new();
        REGISTRY.get_or_init(ShapeRegistry::new)
    }

    pub fn get(&self, shape: Shape, dialect: Dialect) -> Option<Arc<ArrayCodec>> {
        let codecs = self.codecs.read().unwrap_or_else(PoisonError::into_inner);
        codecs.get(&(shape, dialect)).cloned()
    }

    pub fn get_or_create(&self, shape: Shape, dialect: Dialect) -> Arc<ArrayCodec> {
        if let Some(codec) = self.get(shape, dialect) {
            return codec;
        }
        let created = Arc::new(ArrayCodec::new(shape, dialect));
        let mut codecs = self.codecs.write().unwrap_or_else(PoisonError::into_inner);
        codecs
            .entry((shape, dialect))
            .or_insert_with(|| {
                debug!("registered array codec for {shape} ({dialect:?})");
                created
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.codecs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ElementKind;

    #[rstest::rstest]
    fn test_get_or_create_is_memoized() {
        let registry = ShapeRegistry::new();
        let shape = Shape::new(ElementKind::Int4, 2);
        let first = registry.get_or_create(shape, Dialect::Postgres);
        let second = registry.get_or_create(shape, Dialect::Postgres);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);

        let other = registry.get_or_create(shape, Dialect::Standard);
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(registry.len(), 2);
    }

    #[rstest::rstest]
    fn test_concurrent_get_or_create() {
        let registry = Arc::new(ShapeRegistry::new());
        let shape = Shape::new(ElementKind::Text, 1);
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.get_or_create(shape, Dialect::Postgres))
            })
            .collect();
        let codecs: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();
        assert!(codecs.iter().all(|codec| Arc::ptr_eq(codec, &codecs[0])));
        assert_eq!(registry.len(), 1);
    }

    #[rstest::rstest]
    fn test_box_codec_uses_dialect_delimiter() {
        let codec = ArrayCodec::new(Shape::new(ElementKind::Box, 1), Dialect::Postgres);
        let value = codec.decode("{(1,1),(0,0);(3,3),(2,2)}").unwrap();
        assert_eq!(value.as_array().map(|items| items.len()), Some(2));
        assert_eq!(codec.encode(&value).unwrap(), "{(1,1),(0,0);(3,3),(2,2)}");
    }
}
