use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use stratus_common::ConfigurationError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Model,
    EndpointConfig,
    Endpoint,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::EndpointConfig => "endpoint-config",
            Self::Endpoint => "endpoint",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceRef {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn model(name: impl Into<String>) -> Self {
        Self::new(ResourceKind::Model, name)
    }

    pub fn endpoint_config(name: impl Into<String>) -> Self {
        Self::new(ResourceKind::EndpointConfig, name)
    }

    pub fn endpoint(name: impl Into<String>) -> Self {
        Self::new(ResourceKind::Endpoint, name)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind.as_str(), self.name)
    }
}

/// `resource` must not be created before `depends_on` exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dependency {
    pub resource: ResourceRef,
    pub depends_on: ResourceRef,
}

/// Creation-order constraints between the resources of one plan.
///
/// Nodes keep insertion order so [`DependencyGraph::creation_order`] is
/// deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DependencyGraph {
    nodes: Vec<ResourceRef>,
    edges: Vec<Dependency>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: ResourceRef) {
        if !self.nodes.contains(&node) {
            self.nodes.push(node);
        }
    }

    pub fn add_dependency(&mut self, resource: ResourceRef, depends_on: ResourceRef) {
        self.add_node(depends_on.clone());
        self.add_node(resource.clone());
        let edge = Dependency {
            resource,
            depends_on,
        };
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }

    pub fn nodes(&self) -> &[ResourceRef] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Dependency] {
        &self.edges
    }

    pub fn dependencies_of<'a>(
        &'a self,
        resource: &'a ResourceRef,
    ) -> impl Iterator<Item = &'a ResourceRef> + 'a {
        self.edges
            .iter()
            .filter(move |e| &e.resource == resource)
            .map(|e| &e.depends_on)
    }

    /// Topological order: each node appears after all of its dependencies,
    /// ties broken by insertion order.
    pub fn creation_order(&self) -> Result<Vec<ResourceRef>, ConfigurationError> {
        let mut created: HashSet<&ResourceRef> = HashSet::new();
        let mut order = Vec::with_capacity(self.nodes.len());

        while order.len() < self.nodes.len() {
            let next = self.nodes.iter().find(|n| {
                !created.contains(n) && self.dependencies_of(n).all(|d| created.contains(d))
            });
            match next {
                Some(n) => {
                    created.insert(n);
                    order.push(n.clone());
                }
                None => {
                    let stuck = self
                        .nodes
                        .iter()
                        .find(|n| !created.contains(n))
                        .map(|n| n.to_string())
                        .unwrap_or_default();
                    return Err(ConfigurationError::DependencyCycle(stuck));
                }
            }
        }

        Ok(order)
    }

    /// Returns the first `(resource, dependency)` pair in `order` where the
    /// resource comes before its dependency, or before a dependency that
    /// never appears at all.
    pub fn first_violation<'a>(
        &'a self,
        order: &[ResourceRef],
    ) -> Option<(&'a ResourceRef, &'a ResourceRef)> {
        let position = |r: &ResourceRef| order.iter().position(|o| o == r);
        self.edges.iter().find_map(|e| {
            let ok = match (position(&e.resource), position(&e.depends_on)) {
                (Some(r), Some(d)) => d < r,
                (None, _) => true,
                (Some(_), None) => false,
            };
            (!ok).then_some((&e.resource, &e.depends_on))
        })
    }
}
