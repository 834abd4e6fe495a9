use crate::info::FieldType;
use crate::tree::{DataTree, Node};
use crate::{Backend, Engine, Reflect, Scalar, ScalarType, SerialError};

// -----------------------------------------------------------------------------
// TreeBackend

/// A [`Backend`] producing [`DataTree`]s.
///
/// # Examples
///
/// ```
/// use vc_serial::derive::Record;
/// use vc_serial::tree::{DataTree, Node, TreeBackend};
/// use vc_serial::{Engine, Scalar};
///
/// #[derive(Record)]
/// #[serializable(embed_version = false)]
/// struct Tag {
///     name: String,
/// }
///
/// let engine = Engine::new(TreeBackend);
/// let tree: DataTree = engine.serialize(&Tag { name: "blue".into() }).unwrap();
///
/// assert_eq!(tree.len(), 1);
/// assert_eq!(tree.get("name"), Some(&Node::Scalar(Scalar::String("blue".into()))));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBackend;

impl Default for Engine<DataTree> {
    #[inline]
    fn default() -> Self {
        Engine::new(TreeBackend)
    }
}

#[inline]
fn entry<'a>(data: &'a DataTree, key: &str) -> Result<&'a Node, SerialError> {
    data.get(key)
        .ok_or_else(|| SerialError::malformed(format!("missing key `{key}`")))
}

#[cold]
fn unexpected(key: &str, expected: &str, node: &Node) -> SerialError {
    SerialError::malformed(format!(
        "expected `{expected}` under `{key}`, found `{}`",
        node.shape()
    ))
}

impl Backend<DataTree> for TreeBackend {
    #[inline]
    fn new_data(&self) -> DataTree {
        DataTree::new()
    }

    #[inline]
    fn store_scalar(&self, data: &mut DataTree, key: &str, value: Scalar) {
        data.insert(key, Node::Scalar(value));
    }

    fn store_record(
        &self,
        data: &mut DataTree,
        key: &str,
        value: &dyn Reflect,
        engine: &Engine<DataTree>,
    ) -> Result<(), SerialError> {
        let tree = engine.serialize(value)?;
        data.insert(key, Node::Tree(tree));
        Ok(())
    }

    #[inline]
    fn store_scalar_array(&self, data: &mut DataTree, key: &str, array: Vec<Scalar>) {
        data.insert(key, Node::ScalarArray(array));
    }

    fn store_record_array(
        &self,
        data: &mut DataTree,
        key: &str,
        array: &[&dyn Reflect],
        engine: &Engine<DataTree>,
    ) -> Result<(), SerialError> {
        let trees = array
            .iter()
            .map(|item| engine.serialize(*item))
            .collect::<Result<Vec<_>, _>>()?;
        data.insert(key, Node::TreeArray(trees));
        Ok(())
    }

    fn keys<'a>(&self, data: &'a DataTree) -> Vec<&'a str> {
        data.keys().collect()
    }

    fn load_scalar(
        &self,
        data: &DataTree,
        key: &str,
        ty: ScalarType,
    ) -> Result<Scalar, SerialError> {
        match entry(data, key)? {
            Node::Scalar(scalar) => scalar.clone().cast(ty),
            other => Err(unexpected(key, "scalar", other)),
        }
    }

    fn load_record(
        &self,
        data: &DataTree,
        key: &str,
        engine: &Engine<DataTree>,
        ty: &FieldType,
    ) -> Result<Box<dyn Reflect>, SerialError> {
        match entry(data, key)? {
            Node::Tree(tree) => engine.deserialize_type(ty, tree),
            other => Err(unexpected(key, "tree", other)),
        }
    }

    fn load_scalar_array(
        &self,
        data: &DataTree,
        key: &str,
        element: ScalarType,
    ) -> Result<Vec<Scalar>, SerialError> {
        match entry(data, key)? {
            Node::ScalarArray(items) => items
                .iter()
                .map(|item| item.clone().cast(element))
                .collect(),
            other => Err(unexpected(key, "scalar array", other)),
        }
    }

    fn load_record_array(
        &self,
        data: &DataTree,
        key: &str,
        engine: &Engine<DataTree>,
        element: &FieldType,
    ) -> Result<Vec<Box<dyn Reflect>>, SerialError> {
        match entry(data, key)? {
            Node::TreeArray(items) => items
                .iter()
                .map(|tree| engine.deserialize_type(element, tree))
                .collect(),
            other => Err(unexpected(key, "tree array", other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use crate::derive::Record;
    use crate::tree::{DataTree, Node};
    use crate::{Engine, Scalar, SerialError};

    #[derive(Record, Debug, PartialEq)]
    #[serializable]
    struct Point {
        x: i32,
        y: i32,
    }

    #[derive(Record, Debug, PartialEq)]
    #[serializable(version = 2)]
    struct Route {
        name: String,
        stops: [Point; 2],
        weights: Box<[f64]>,
        codes: Vec<char>,
    }

    fn route() -> Route {
        Route {
            name: "loop".into(),
            stops: [Point { x: 1, y: 2 }, Point { x: -3, y: 4 }],
            weights: vec![0.25, 1.5].into_boxed_slice(),
            codes: vec!['a', 'z'],
        }
    }

    #[test]
    fn record_arrays() {
        let engine = Engine::<DataTree>::default();
        let data = engine.serialize(&route()).unwrap();

        let Some(Node::TreeArray(stops)) = data.get("stops") else {
            panic!("expected a tree array");
        };
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[1].get("x"), Some(&Node::Scalar(Scalar::I32(-3))));

        assert_eq!(engine.deserialize::<Route>(&data), Ok(route()));
    }

    #[test]
    fn fixed_array_length() {
        let engine = Engine::<DataTree>::default();
        let mut data = engine.serialize(&route()).unwrap();

        let one = engine.serialize(&Point { x: 0, y: 0 }).unwrap();
        data.insert("stops", Node::TreeArray(vec![one]));

        assert!(matches!(
            engine.deserialize::<Route>(&data),
            Err(SerialError::MalformedData(_))
        ));
    }

    #[test]
    fn mismatch_messages() {
        let engine = Engine::<DataTree>::default();
        let mut data = engine.serialize(&route()).unwrap();
        data.insert("stops", Node::Scalar(Scalar::I32(1)));

        assert_eq!(
            engine.deserialize::<Route>(&data),
            Err(SerialError::MalformedData(
                "expected `tree array` under `stops`, found `scalar`".into()
            ))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn printed_form() {
        let engine = Engine::<DataTree>::default();
        let data = engine.serialize(&Point { x: 3, y: -4 }).unwrap();

        assert_eq!(
            serde_json::to_string(&data).unwrap(),
            r#"{"serial_version":0,"x":3,"y":-4}"#
        );
    }
}
