//! Compiles a module produced by the emitter and drives it.
//!
//! `fixtures/container.rs` is checked against `emit_rust` output, so the
//! code that runs here is exactly what a build writes.

use std::rc::Rc;

use pretty_assertions::assert_eq;
use tether_codegen::{emit_rust, EmitOptions, ResolverPlan};
use tether_diagnostic::queue::DiagnosticQueue;
use tether_graph::{ConstructorVerifier, ResolutionGraph};
use tether_ir::{
    ClassHeritage, ConstructorSignature, InterfaceHeritage, ParamType, RegistrationIntent, Symbol,
};
use tether_runtime::{Instance, ResolveError};

#[path = "fixtures/container.rs"]
mod container;

use container::Container;

mod log {
    pub mod console {
        use std::rc::Rc;

        use tether_runtime::{Arg, Construct, Instance};

        pub struct ConsoleLogger;

        impl Construct for ConsoleLogger {
            fn construct(_args: Vec<Arg>) -> Instance {
                Rc::new(ConsoleLogger)
            }
        }
    }
}

mod app {
    use std::rc::Rc;

    use tether_runtime::{Arg, Construct, Instance};

    use crate::log::console::ConsoleLogger;

    pub struct App {
        pub logger: Rc<ConsoleLogger>,
        pub name_is_null: bool,
    }

    impl Construct for App {
        fn construct(args: Vec<Arg>) -> Instance {
            let logger = args[0]
                .service::<ConsoleLogger>()
                .unwrap_or_else(|| panic!("App needs a ConsoleLogger"));
            Rc::new(App {
                logger,
                name_is_null: args[1].is_null(),
            })
        }
    }
}

mod audit {
    use std::rc::Rc;

    use tether_runtime::{Arg, Construct, Instance};

    pub struct Audit {
        pub members: Vec<Instance>,
    }

    impl Construct for Audit {
        fn construct(args: Vec<Arg>) -> Instance {
            let members = match &args[0] {
                Arg::All(members) => members.clone(),
                other => panic!("Audit expects every member, got {other:?}"),
            };
            Rc::new(Audit { members })
        }
    }
}

fn plan() -> ResolverPlan {
    let logger = Symbol::new("api.ts", "Logger");
    let console = Symbol::new("log/console.ts", "ConsoleLogger");
    let app = Symbol::new("app.ts", "App");
    let audit = Symbol::new("audit.ts", "Audit");

    let mut graph = ResolutionGraph::new();
    graph.add_interfaces([InterfaceHeritage::new(logger.clone())]);
    graph.add_classes([
        ClassHeritage::new(console.clone()).implementing(logger.clone()),
        ClassHeritage::new(app.clone()),
        ClassHeritage::new(audit.clone()),
    ]);
    graph.register(&RegistrationIntent::singleton(console));
    graph.register(&RegistrationIntent::factory(app.clone()));
    graph.register(&RegistrationIntent::factory(audit.clone()));

    let mut queue = DiagnosticQueue::new();
    let map = graph
        .finalize(&mut queue)
        .unwrap_or_else(|_| panic!("finalize failed"));
    let mut verifier = ConstructorVerifier::new(&graph, &map);
    verifier.add_constructors([
        ConstructorSignature::new(
            app.clone(),
            vec![
                ParamType::Single(logger.clone()),
                ParamType::Primitive("string".into()),
            ],
        ),
        ConstructorSignature::new(audit, vec![ParamType::Intersection(vec![logger, app])]),
    ]);
    ResolverPlan::build(&map, &verifier)
}

fn downcast<T: 'static>(instance: Instance) -> Rc<T> {
    instance
        .downcast::<T>()
        .unwrap_or_else(|_| panic!("unexpected instance type"))
}

fn resolve(container: &mut Container, id: &str) -> Instance {
    container
        .resolve(id)
        .unwrap_or_else(|e| panic!("resolve {id}: {e}"))
}

#[test]
fn test_fixture_matches_emitter() {
    assert_eq!(
        emit_rust(&plan(), &EmitOptions::default()),
        include_str!("fixtures/container.rs")
    );
}

#[test]
fn test_singleton_shared_across_ids() {
    let mut container = Container::new();
    let by_interface = resolve(&mut container, "api_ots_SLogger");
    let by_class = resolve(&mut container, "log_dconsole_ots_SConsoleLogger");
    assert!(Rc::ptr_eq(&by_interface, &by_class));

    let app = downcast::<app::App>(resolve(&mut container, "app_ots_SApp"));
    let logger = downcast::<log::console::ConsoleLogger>(by_class);
    assert!(Rc::ptr_eq(&app.logger, &logger));
    assert!(app.name_is_null);
}

#[test]
fn test_factory_builds_fresh_instances() {
    let mut container = Container::new();
    let first = resolve(&mut container, "app_ots_SApp");
    let second = resolve(&mut container, "app_ots_SApp");
    assert!(!Rc::ptr_eq(&first, &second));
}

#[test]
fn test_intersection_receives_every_member() {
    let mut container = Container::new();
    let audit = downcast::<audit::Audit>(resolve(&mut container, "audit_ots_SAudit"));
    assert_eq!(audit.members.len(), 2);

    let logger = resolve(&mut container, "api_ots_SLogger");
    assert!(Rc::ptr_eq(&audit.members[0], &logger));
    let app = downcast::<app::App>(Rc::clone(&audit.members[1]));
    assert!(Rc::ptr_eq(&app.logger, &downcast::<log::console::ConsoleLogger>(logger)));
}

#[test]
fn test_unknown_id_is_an_error() {
    let mut container = Container::new();
    assert_eq!(
        container.resolve("nope_ots_SNope").err(),
        Some(ResolveError::Unknown("nope_ots_SNope".to_string()))
    );
}
