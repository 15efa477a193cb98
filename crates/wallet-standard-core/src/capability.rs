//! Capability model
//!
//! A capability is a named, versioned record of async methods. Wallets and
//! accounts carry two independent maps of them:
//!
//! - **features**: names from the shared vocabulary (see [`crate::features`])
//! - **extensions**: provider-specific names outside any shared vocabulary
//!
//! The two maps use different key types so a standard feature name can never
//! be looked up in, or leak into, the extension map and vice versa.
//!
//! ```text
//! FeatureMap
//!   "standard:signMessage" ─► Capability { version: 1.0.0, methods: { signMessage } }
//!   "solana:signAndSendTransaction" ─► Capability { version: 1.0.0, ... }
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use semver::Version;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{BoxError, CoreError, Result};

macro_rules! capability_name {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            /// Build a name from a static string without validation
            pub const fn from_static(name: &'static str) -> Self {
                Self(Cow::Borrowed(name))
            }

            /// Parse and validate a name
            pub fn parse(name: &str) -> Result<Self> {
                if name.is_empty() || name.chars().any(char::is_whitespace) {
                    return Err(CoreError::InvalidCapabilityName(name.to_string()));
                }
                Ok(Self(Cow::Owned(name.to_string())))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Namespace prefix before the first `:`, if any
            pub fn namespace(&self) -> Option<&str> {
                self.0.split_once(':').map(|(ns, _)| ns)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

capability_name!(
    /// Name of a standard feature, e.g. `standard:signMessage`
    FeatureName
);

capability_name!(
    /// Name of a provider-specific extension
    ExtensionName
);

/// An async operation exposed by a capability
///
/// Inputs and outputs cross the boundary as JSON values; the feature modules
/// provide typed wrappers on both sides.
#[async_trait]
pub trait Method: Send + Sync {
    async fn call(&self, input: Value) -> std::result::Result<Value, BoxError>;
}

struct TypedMethod<I, O, F, Fut> {
    f: F,
    _marker: PhantomData<fn(I) -> (O, Fut)>,
}

#[async_trait]
impl<I, O, F, Fut> Method for TypedMethod<I, O, F, Fut>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<O, BoxError>> + Send + 'static,
{
    async fn call(&self, input: Value) -> std::result::Result<Value, BoxError> {
        let input: I = serde_json::from_value(input)?;
        let output = (self.f)(input).await?;
        Ok(serde_json::to_value(output)?)
    }
}

/// Adapt a typed async closure into a [`Method`]
pub fn typed_method<I, O, F, Fut>(f: F) -> Arc<dyn Method>
where
    I: DeserializeOwned + Send + 'static,
    O: Serialize + Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = std::result::Result<O, BoxError>> + Send + 'static,
{
    Arc::new(TypedMethod {
        f,
        _marker: PhantomData,
    })
}

/// A versioned record of named methods
#[derive(Clone)]
pub struct Capability {
    version: Version,
    methods: BTreeMap<String, Arc<dyn Method>>,
}

impl Capability {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            methods: BTreeMap::new(),
        }
    }

    /// Create a capability from a version string such as `"1.0.0"`
    pub fn with_version_str(version: &str) -> Result<Self> {
        Ok(Self::new(Version::parse(version)?))
    }

    /// Add a method (builder style)
    pub fn with_method(mut self, name: impl Into<String>, method: Arc<dyn Method>) -> Self {
        self.methods.insert(name.into(), method);
        self
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn method(&self, name: &str) -> Option<&Arc<dyn Method>> {
        self.methods.get(name)
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Call a method with a raw JSON input
    pub async fn invoke(&self, method: &str, input: Value) -> Result<Value> {
        let m = self
            .method(method)
            .ok_or_else(|| CoreError::MethodNotFound(method.to_string()))?;
        m.call(input).await.map_err(|source| CoreError::Method {
            method: method.to_string(),
            source,
        })
    }

    /// Call a method with typed input and output
    pub async fn call<I, O>(&self, method: &str, input: &I) -> Result<O>
    where
        I: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let input = serde_json::to_value(input)?;
        let output = self.invoke(method, input).await?;
        Ok(serde_json::from_value(output)?)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capability")
            .field("version", &self.version.to_string())
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Capabilities are equal when they share a version and the very same
/// method objects.
impl PartialEq for Capability {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.methods.len() == other.methods.len()
            && self.methods.iter().zip(other.methods.iter()).all(|((a, ma), (b, mb))| {
                a == b && std::ptr::eq(Arc::as_ptr(ma) as *const (), Arc::as_ptr(mb) as *const ())
            })
    }
}

/// Mapping from capability name to capability record
#[derive(Clone, PartialEq)]
pub struct CapabilityMap<N: Ord> {
    entries: BTreeMap<N, Capability>,
}

/// Standard features of a wallet or account
pub type FeatureMap = CapabilityMap<FeatureName>;

/// Provider-specific extensions of a wallet or account
pub type ExtensionMap = CapabilityMap<ExtensionName>;

impl<N: Ord> Default for CapabilityMap<N> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<N: Ord + Clone + fmt::Display> CapabilityMap<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a capability (builder style)
    pub fn with(mut self, name: N, capability: Capability) -> Self {
        self.entries.insert(name, capability);
        self
    }

    /// Insert a capability, returning the one it replaced
    pub fn insert(&mut self, name: N, capability: Capability) -> Option<Capability> {
        self.entries.insert(name, capability)
    }

    pub fn remove(&mut self, name: &N) -> Option<Capability> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &N) -> Option<&Capability> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &N) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &N> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&N, &Capability)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every name in `self` is also present in `other`
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.entries.keys().all(|name| other.entries.contains_key(name))
    }

    /// Look up a capability only if its major version is `major`
    pub fn compatible(&self, name: &N, major: u64) -> Option<&Capability> {
        self.entries
            .get(name)
            .filter(|capability| capability.version.major == major)
    }

    /// Like [`CapabilityMap::compatible`] but explains a miss
    pub fn require(&self, name: &N, major: u64) -> Result<&Capability> {
        let capability = self
            .entries
            .get(name)
            .ok_or_else(|| CoreError::FeatureUnavailable(name.to_string()))?;
        if capability.version.major != major {
            return Err(CoreError::IncompatibleVersion {
                name: name.to_string(),
                found: capability.version.clone(),
                expected_major: major,
            });
        }
        Ok(capability)
    }

    /// Least-privilege view of this map for a requested name list.
    ///
    /// `None` grants everything. `Some(names)` keeps exactly the requested
    /// names that are present; unknown names are omitted, and an empty list
    /// grants nothing.
    pub fn restrict(&self, requested: Option<&[N]>) -> Self {
        match requested {
            None => self.clone(),
            Some(names) => names
                .iter()
                .filter_map(|name| {
                    self.entries
                        .get(name)
                        .map(|capability| (name.clone(), capability.clone()))
                })
                .collect(),
        }
    }

    /// Name to version string, for display and serialisation
    pub fn versions(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(name, capability)| (name.to_string(), capability.version.to_string()))
            .collect()
    }
}

impl<N: Ord> FromIterator<(N, Capability)> for CapabilityMap<N> {
    fn from_iter<T: IntoIterator<Item = (N, Capability)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<N: Ord + fmt::Debug> fmt::Debug for CapabilityMap<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}
