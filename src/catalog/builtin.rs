//! Builtin entity types and relationship rules for the eleven layers

use crate::models::{AllowedDirection, Cardinality, Layer, RelationshipKind};

use AllowedDirection::{Bidirectional as BIDI, IntraLayer as INTRA, UpwardOnly as UP};
use Cardinality::{ManyToMany as N_N, ManyToOne as N_1, OneToMany as ONE_N, OneToOne as ONE_ONE};
use RelationshipKind::{
    Access, Aggregation, Assignment, Association, Composition, Flow, PartOf, Realization,
    Reference, Serving, Specialization, Triggering,
};

/// Entity types known to each layer
pub(crate) const ENTITY_TYPES: &[(Layer, &[&str])] = &[
    (
        Layer::Motivation,
        &[
            "Stakeholder",
            "Driver",
            "Assessment",
            "Goal",
            "Outcome",
            "Principle",
            "Requirement",
            "Constraint",
            "Meaning",
            "Value",
        ],
    ),
    (
        Layer::Business,
        &[
            "BusinessActor",
            "BusinessRole",
            "BusinessCollaboration",
            "BusinessInterface",
            "BusinessProcess",
            "BusinessFunction",
            "BusinessInteraction",
            "BusinessEvent",
            "BusinessService",
            "BusinessObject",
            "Contract",
            "Product",
        ],
    ),
    (
        Layer::Security,
        &[
            "SecurityRole",
            "Permission",
            "SecurityPolicy",
            "Threat",
            "Countermeasure",
            "DataClassification",
        ],
    ),
    (
        Layer::Application,
        &[
            "ApplicationComponent",
            "ApplicationCollaboration",
            "ApplicationInterface",
            "ApplicationFunction",
            "ApplicationProcess",
            "ApplicationEvent",
            "ApplicationService",
            "DataObject",
        ],
    ),
    (
        Layer::Technology,
        &[
            "Node",
            "Device",
            "SystemSoftware",
            "TechnologyInterface",
            "TechnologyService",
            "Artifact",
            "CommunicationNetwork",
            "Path",
        ],
    ),
    (
        Layer::Api,
        &["OpenAPIDocument", "PathItem", "Operation", "SecurityScheme"],
    ),
    (Layer::DataModel, &["JSONSchema", "SchemaProperty"]),
    (
        Layer::Datastore,
        &["Database", "DatabaseSchema", "Table", "Column", "Index"],
    ),
    (Layer::Ux, &["View", "ViewComponent", "Action"]),
    (
        Layer::Navigation,
        &["Route", "NavigationFlow", "NavigationGuard"],
    ),
    (Layer::Apm, &["Trace", "Span", "Metric", "Alert"]),
];

/// Static rule definition
#[derive(Debug, Clone, Copy)]
pub(crate) struct RuleDef {
    pub source: &'static str,
    pub predicate: &'static str,
    pub inverse: &'static str,
    pub target: &'static str,
    pub cardinality: Cardinality,
    pub direction: AllowedDirection,
    pub kind: RelationshipKind,
    pub required: bool,
    pub native: bool,
}

const fn rule(
    source: &'static str,
    predicate: &'static str,
    inverse: &'static str,
    target: &'static str,
    cardinality: Cardinality,
    direction: AllowedDirection,
    kind: RelationshipKind,
) -> RuleDef {
    RuleDef {
        source,
        predicate,
        inverse,
        target,
        cardinality,
        direction,
        kind,
        required: false,
        native: false,
    }
}

impl RuleDef {
    const fn required(self) -> Self {
        RuleDef {
            required: true,
            ..self
        }
    }

    const fn native(self) -> Self {
        RuleDef {
            native: true,
            ..self
        }
    }
}

#[rustfmt::skip]
pub(crate) const RULES: &[RuleDef] = &[
    // Motivation
    rule("Goal", "composes", "composed-by", "Goal", N_N, INTRA, Composition),
    rule("Goal", "aggregates", "aggregated-by", "Outcome", N_N, INTRA, Aggregation),
    rule("Goal", "specializes", "specialized-by", "Goal", N_1, INTRA, Specialization),
    rule("Outcome", "realizes-goals", "realized-by-outcomes", "Goal", N_N, INTRA, Realization),
    rule("Principle", "realizes-goals", "realized-by-principles", "Goal", N_N, INTRA, Realization),
    rule("Requirement", "realizes-outcomes", "realized-by-requirements", "Outcome", N_N, INTRA, Realization),
    rule("Requirement", "composes", "composed-by", "Requirement", N_N, INTRA, Composition),
    rule("Constraint", "specializes", "specialized-by", "Requirement", N_1, INTRA, Specialization),
    rule("Driver", "concerns-stakeholders", "concerned-by-drivers", "Stakeholder", N_N, INTRA, Association),
    rule("Assessment", "assesses-drivers", "assessed-by", "Driver", ONE_N, INTRA, Association),
    rule("Value", "valued-by-stakeholders", "values", "Stakeholder", N_N, INTRA, Association),
    // Business
    rule("BusinessActor", "assigned-to-roles", "assigned-actors", "BusinessRole", N_N, INTRA, Assignment),
    rule("BusinessActor", "delivers-value", "delivered-by", "Value", N_N, UP, Association),
    rule("BusinessRole", "assigned-to-processes", "assigned-roles", "BusinessProcess", N_N, INTRA, Assignment),
    rule("BusinessCollaboration", "aggregates", "aggregated-by", "BusinessRole", ONE_N, INTRA, Aggregation),
    rule("BusinessInterface", "part-of", "has-parts", "BusinessRole", N_1, INTRA, PartOf),
    rule("BusinessProcess", "composes", "composed-by", "BusinessProcess", N_N, INTRA, Composition),
    rule("BusinessProcess", "triggers", "triggered-by", "BusinessProcess", N_N, INTRA, Triggering),
    rule("BusinessProcess", "flows-to", "receives-flow-from", "BusinessProcess", N_N, INTRA, Flow),
    rule("BusinessProcess", "realizes-services", "realized-by", "BusinessService", N_N, INTRA, Realization),
    rule("BusinessProcess", "accesses-objects", "accessed-by", "BusinessObject", N_N, INTRA, Access),
    rule("BusinessProcess", "specializes", "specialized-by", "BusinessProcess", N_1, INTRA, Specialization),
    rule("BusinessProcess", "supports-goals", "supported-by", "Goal", N_N, UP, Reference),
    rule("BusinessProcess", "governed-by-principles", "governs", "Principle", N_N, UP, Reference),
    rule("BusinessFunction", "composes", "composed-by", "BusinessFunction", N_N, INTRA, Composition),
    rule("BusinessFunction", "aggregates", "aggregated-by", "BusinessProcess", N_N, INTRA, Aggregation),
    rule("BusinessInteraction", "realizes-services", "realized-by", "BusinessService", N_N, INTRA, Realization),
    rule("BusinessEvent", "triggers", "triggered-by", "BusinessProcess", N_N, INTRA, Triggering),
    rule("BusinessService", "supports-goals", "supported-by", "Goal", N_N, UP, Reference),
    rule("BusinessService", "governed-by-principles", "governs", "Principle", N_N, UP, Reference),
    rule("BusinessService", "fulfills-requirements", "fulfilled-by", "Requirement", N_N, UP, Reference),
    rule("BusinessService", "serves-roles", "served-by", "BusinessRole", N_N, INTRA, Serving),
    rule("BusinessService", "specializes", "specialized-by", "BusinessService", N_1, INTRA, Specialization),
    rule("BusinessObject", "composes", "composed-by", "BusinessObject", N_N, INTRA, Composition),
    rule("Contract", "specializes", "specialized-by", "BusinessObject", N_1, INTRA, Specialization),
    rule("Product", "aggregates", "aggregated-by", "BusinessService", ONE_N, INTRA, Aggregation),
    rule("Product", "includes-contracts", "included-in-products", "Contract", N_N, INTRA, Aggregation),
    // Security
    rule("SecurityRole", "maps-to-business-roles", "mapped-security-roles", "BusinessRole", N_N, UP, Reference),
    rule("SecurityRole", "grants-permissions", "granted-to", "Permission", N_N, INTRA, Assignment),
    rule("Permission", "protects-objects", "protected-by", "BusinessObject", N_N, UP, Reference),
    rule("SecurityPolicy", "governed-by-principles", "governs", "Principle", N_N, UP, Reference),
    rule("SecurityPolicy", "enforces-requirements", "enforced-by", "Requirement", N_N, UP, Realization),
    rule("SecurityPolicy", "composes", "composed-by", "SecurityPolicy", N_N, INTRA, Composition),
    rule("Threat", "threatens-services", "threatened-by", "BusinessService", N_N, UP, Association),
    rule("Countermeasure", "mitigates-threats", "mitigated-by", "Threat", ONE_N, INTRA, Association),
    rule("DataClassification", "classifies-objects", "classified-by", "BusinessObject", N_N, UP, Association),
    // Application
    rule("ApplicationComponent", "composes", "composed-by", "ApplicationComponent", N_N, INTRA, Composition),
    rule("ApplicationComponent", "assigned-to-functions", "assigned-components", "ApplicationFunction", N_N, INTRA, Assignment),
    rule("ApplicationComponent", "specializes", "specialized-by", "ApplicationComponent", N_1, INTRA, Specialization),
    rule("ApplicationComponent", "governed-by-principles", "governs", "Principle", N_N, UP, Reference),
    rule("ApplicationCollaboration", "aggregates", "aggregated-by", "ApplicationComponent", ONE_N, INTRA, Aggregation),
    rule("ApplicationCollaboration", "specializes", "specialized-by", "ApplicationComponent", N_1, INTRA, Specialization),
    rule("ApplicationInterface", "part-of", "has-parts", "ApplicationComponent", N_1, INTRA, PartOf),
    rule("ApplicationFunction", "realizes-services", "realized-by", "ApplicationService", N_N, INTRA, Realization),
    rule("ApplicationProcess", "triggers", "triggered-by", "ApplicationProcess", N_N, INTRA, Triggering),
    rule("ApplicationProcess", "flows-to", "receives-flow-from", "ApplicationProcess", N_N, INTRA, Flow),
    rule("ApplicationProcess", "realizes-services", "realized-by", "ApplicationService", N_N, INTRA, Realization),
    rule("ApplicationEvent", "triggers", "triggered-by", "ApplicationProcess", N_N, INTRA, Triggering),
    rule("ApplicationService", "realizes-business-services", "realized-by-application-services", "BusinessService", N_N, UP, Realization),
    rule("ApplicationService", "serves-processes", "served-by", "BusinessProcess", N_N, UP, Serving),
    rule("ApplicationService", "supports-goals", "supported-by", "Goal", N_N, UP, Reference),
    rule("ApplicationService", "governed-by-principles", "governs", "Principle", N_N, UP, Reference),
    rule("ApplicationService", "fulfills-requirements", "fulfilled-by", "Requirement", N_N, UP, Reference),
    rule("ApplicationService", "secured-by-policies", "secures", "SecurityPolicy", N_N, UP, Reference),
    rule("DataObject", "realizes-business-objects", "realized-by-data-objects", "BusinessObject", N_N, UP, Realization),
    rule("DataObject", "classified-as", "classifies", "DataClassification", N_1, UP, Association),
    // Technology
    rule("Node", "composes", "composed-by", "Node", N_N, INTRA, Composition),
    rule("Node", "governed-by-principles", "governs", "Principle", N_N, UP, Reference),
    rule("Node", "realizes-services", "realized-by", "TechnologyService", N_N, INTRA, Realization),
    rule("Node", "hosts-artifacts", "hosted-on", "Artifact", N_N, INTRA, Assignment),
    rule("Node", "secured-by-policies", "secures", "SecurityPolicy", N_N, UP, Reference),
    rule("Device", "composes", "composed-by", "Node", N_N, INTRA, Composition),
    rule("Device", "specializes", "specialized-by", "Node", N_1, INTRA, Specialization),
    rule("SystemSoftware", "specializes", "specialized-by", "Node", N_1, INTRA, Specialization),
    rule("SystemSoftware", "composes", "composed-by", "SystemSoftware", N_N, INTRA, Composition),
    rule("Artifact", "realizes-components", "realized-by-artifacts", "ApplicationComponent", N_N, UP, Realization),
    rule("Artifact", "realizes-data-objects", "realized-by-artifacts", "DataObject", N_N, UP, Realization),
    rule("TechnologyService", "serves-components", "served-by", "ApplicationComponent", N_N, UP, Serving),
    rule("TechnologyService", "governed-by-principles", "governs", "Principle", N_N, UP, Reference),
    rule("TechnologyInterface", "part-of", "has-parts", "Node", N_1, INTRA, PartOf),
    rule("CommunicationNetwork", "aggregates", "aggregated-by", "Node", N_N, INTRA, Aggregation),
    rule("Path", "connects-nodes", "connected-by", "Node", ONE_N, INTRA, Association),
    // API
    rule("OpenAPIDocument", "composes", "composed-by", "PathItem", N_N, INTRA, Composition),
    rule("OpenAPIDocument", "exposes-services", "exposed-by-documents", "ApplicationService", N_N, UP, Realization),
    rule("PathItem", "composes", "composed-by", "Operation", ONE_N, INTRA, Composition),
    rule("Operation", "exposes-service", "exposed-by-operations", "ApplicationService", N_1, UP, Realization),
    rule("Operation", "supports-goals", "supported-by", "Goal", N_N, UP, Reference),
    rule("Operation", "governed-by-principles", "governs", "Principle", N_N, UP, Reference),
    rule("Operation", "fulfills-requirements", "fulfilled-by", "Requirement", N_N, UP, Reference),
    rule("Operation", "secured-by", "secures-operations", "SecurityScheme", N_N, INTRA, Association),
    rule("Operation", "$ref", "referenced-by", "JSONSchema", ONE_ONE, BIDI, Association).native(),
    rule("SecurityScheme", "maps-to-policies", "mapped-schemes", "SecurityPolicy", N_N, UP, Reference),
    // Data model
    rule("JSONSchema", "composes", "composed-by", "SchemaProperty", N_N, INTRA, Composition),
    rule("JSONSchema", "specializes", "specialized-by", "JSONSchema", N_1, INTRA, Specialization),
    rule("JSONSchema", "$ref", "referenced-by", "JSONSchema", ONE_ONE, INTRA, Association).native(),
    rule("JSONSchema", "realizes-data-objects", "realized-by-schemas", "DataObject", N_N, UP, Realization),
    rule("JSONSchema", "classified-as", "classifies", "DataClassification", N_1, UP, Association),
    rule("JSONSchema", "governed-by-principles", "governs", "Principle", N_N, UP, Reference),
    rule("SchemaProperty", "part-of", "has-parts", "JSONSchema", N_1, INTRA, PartOf),
    rule("SchemaProperty", "$ref", "referenced-by", "JSONSchema", ONE_ONE, INTRA, Association).native(),
    // Datastore
    rule("Database", "composes", "composed-by", "DatabaseSchema", N_N, INTRA, Composition),
    rule("Database", "deployed-on", "hosts-databases", "Node", N_1, UP, Assignment),
    rule("DatabaseSchema", "composes", "composed-by", "Table", N_N, INTRA, Composition),
    rule("Table", "composes", "composed-by", "Column", ONE_N, INTRA, Composition),
    rule("Table", "stores-schema", "stored-in", "JSONSchema", N_1, UP, Realization),
    rule("Column", "foreign-key-to", "referenced-by-foreign-keys", "Column", N_1, INTRA, Association),
    rule("Column", "stores-property", "stored-in-columns", "SchemaProperty", N_1, UP, Realization),
    rule("Index", "indexes-columns", "indexed-by", "Column", ONE_N, INTRA, Association),
    // UX
    rule("View", "composes", "composed-by", "ViewComponent", N_N, INTRA, Composition),
    rule("View", "specializes", "specialized-by", "View", N_1, INTRA, Specialization),
    rule("View", "supports-goals", "supported-by", "Goal", N_N, UP, Reference),
    rule("View", "serves-processes", "served-by", "BusinessProcess", N_N, UP, Serving),
    rule("ViewComponent", "composes", "composed-by", "ViewComponent", N_N, INTRA, Composition),
    rule("ViewComponent", "binds-schema", "bound-to-components", "JSONSchema", N_1, UP, Association),
    rule("ViewComponent", "triggers", "triggered-by", "Action", N_N, INTRA, Triggering),
    rule("Action", "invokes-operation", "invoked-by", "Operation", N_1, UP, Association),
    // Navigation
    rule("Route", "renders-view", "rendered-by", "View", ONE_ONE, UP, Association).required(),
    rule("Route", "flows-to", "receives-flow-from", "Route", N_N, INTRA, Flow),
    rule("Route", "guarded-by", "guards", "NavigationGuard", N_N, INTRA, Association),
    rule("NavigationFlow", "aggregates", "aggregated-by", "Route", ONE_N, INTRA, Aggregation),
    rule("NavigationFlow", "realizes-processes", "realized-by-flows", "BusinessProcess", N_N, UP, Realization),
    rule("NavigationGuard", "enforces-policies", "enforced-by-guards", "SecurityPolicy", N_N, UP, Realization),
    // APM
    rule("Trace", "composes", "composed-by", "Span", ONE_N, INTRA, Composition),
    rule("Span", "composes", "composed-by", "Span", N_N, INTRA, Composition),
    rule("Span", "operationId", "traced-by", "Operation", ONE_ONE, UP, Association).native(),
    rule("Span", "instruments-component", "instrumented-by", "ApplicationComponent", N_1, UP, Association),
    rule("Metric", "measures-outcomes", "measured-by", "Outcome", N_N, UP, Reference),
    rule("Metric", "supports-goals", "supported-by", "Goal", N_N, UP, Reference),
    rule("Metric", "monitors-services", "monitored-by", "ApplicationService", N_N, UP, Association),
    rule("Alert", "watches-metrics", "watched-by", "Metric", ONE_N, INTRA, Association).required(),
];
