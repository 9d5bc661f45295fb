use std::rc::Rc;

use tether_diagnostic::queue::DiagnosticQueue;
use tether_graph::{ConstructorVerifier, ResolutionGraph};
use tether_ir::{
    ClassHeritage, ConstructorSignature, InterfaceHeritage, ParamType, RegistrationIntent, Symbol,
};
use tether_runtime::{Arg, Construct, Instance, ResolveError};

use super::PlanContainer;
use crate::ResolverPlan;

struct A;

impl Construct for A {
    fn construct(_args: Vec<Arg>) -> Instance {
        Rc::new(A)
    }
}

struct B {
    a: Rc<A>,
}

struct C {
    a: Rc<A>,
    b: Rc<B>,
}

fn sym(name: &str) -> Symbol {
    Symbol::new("chain.ts", name)
}

fn downcast<T: 'static>(instance: Instance) -> Rc<T> {
    instance
        .downcast::<T>()
        .unwrap_or_else(|_| panic!("unexpected instance type"))
}

fn service<T: 'static>(arg: &Arg) -> Rc<T> {
    arg.service::<T>()
        .unwrap_or_else(|| panic!("expected a service argument, got {arg:?}"))
}

/// `A` (singleton) <- `B` (factory, needs A) <- `C` (factory, needs A and B).
fn chain_plan() -> ResolverPlan {
    let (a, b, c) = (sym("A"), sym("B"), sym("C"));
    let mut graph = ResolutionGraph::new();
    graph.add_classes([
        ClassHeritage::new(a.clone()),
        ClassHeritage::new(b.clone()),
        ClassHeritage::new(c.clone()),
    ]);
    graph.register(&RegistrationIntent::singleton(a.clone()));
    graph.register(&RegistrationIntent::factory(b.clone()));
    graph.register(&RegistrationIntent::factory(c.clone()));

    let mut queue = DiagnosticQueue::new();
    let map = graph
        .finalize(&mut queue)
        .unwrap_or_else(|_| panic!("finalize failed"));
    let mut verifier = ConstructorVerifier::new(&graph, &map);
    verifier.add_constructors([
        ConstructorSignature::new(b.clone(), vec![ParamType::Single(a.clone())]),
        ConstructorSignature::new(
            c,
            vec![ParamType::Single(a), ParamType::Single(b)],
        ),
    ]);
    ResolverPlan::build(&map, &verifier)
}

fn chain_container(plan: &ResolverPlan) -> PlanContainer<'_> {
    let mut container = PlanContainer::new(plan);
    container
        .provide_type::<A>(&sym("A"))
        .provide(&sym("B"), |args| {
            Rc::new(B {
                a: service(&args[0]),
            })
        })
        .provide(&sym("C"), |args| {
            Rc::new(C {
                a: service(&args[0]),
                b: service(&args[1]),
            })
        });
    container
}

fn resolve<T: 'static>(container: &mut PlanContainer<'_>, symbol: &Symbol) -> Rc<T> {
    let instance = container
        .resolve(symbol.id().as_str())
        .unwrap_or_else(|e| panic!("resolve {symbol} failed: {e}"));
    downcast(instance)
}

#[test]
fn test_singleton_identity() {
    let plan = chain_plan();
    let mut container = chain_container(&plan);
    let first: Rc<A> = resolve(&mut container, &sym("A"));
    let second: Rc<A> = resolve(&mut container, &sym("A"));
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(container.singleton_count(), 1);
}

#[test]
fn test_factory_instances_are_distinct() {
    let plan = chain_plan();
    let mut container = chain_container(&plan);
    let first: Rc<B> = resolve(&mut container, &sym("B"));
    let second: Rc<B> = resolve(&mut container, &sym("B"));
    assert!(!Rc::ptr_eq(&first, &second));
    assert!(Rc::ptr_eq(&first.a, &second.a));
}

#[test]
fn test_constructor_injection_chaining() {
    let plan = chain_plan();
    let mut container = chain_container(&plan);
    let c1: Rc<C> = resolve(&mut container, &sym("C"));
    let c2: Rc<C> = resolve(&mut container, &sym("C"));

    assert!(!Rc::ptr_eq(&c1, &c2));
    assert!(!Rc::ptr_eq(&c1.b, &c2.b));
    assert!(Rc::ptr_eq(&c1.a, &c2.a));
    assert!(Rc::ptr_eq(&c1.a, &c1.b.a));
    assert!(Rc::ptr_eq(&c2.a, &c2.b.a));
}

#[test]
fn test_unknown_id_fails_at_dispatch() {
    let plan = chain_plan();
    let mut container = chain_container(&plan);
    assert_eq!(
        container.resolve("nowhere_ots_SNothing").err(),
        Some(ResolveError::Unknown("nowhere_ots_SNothing".to_string()))
    );
}

#[test]
fn test_missing_constructor_closure() {
    let plan = chain_plan();
    let mut container = PlanContainer::new(&plan);
    let b = sym("B");
    container.provide(&b, |_| Rc::new(()));
    assert_eq!(
        container.resolve(b.id().as_str()).err(),
        Some(ResolveError::MissingConstructor(sym("A").id().to_string()))
    );
}

struct Impl;

#[test]
fn test_aliases_share_one_singleton() {
    let api = Symbol::new("api.ts", "Api");
    let base = Symbol::new("api.ts", "Base");
    let imp = Symbol::new("impl.ts", "Impl");
    let mut graph = ResolutionGraph::new();
    graph.add_interfaces([
        InterfaceHeritage::new(base.clone()),
        InterfaceHeritage::new(api.clone()).extending(base.clone()),
    ]);
    graph.add_classes([ClassHeritage::new(imp.clone()).implementing(api.clone())]);
    graph.register(&RegistrationIntent::singleton(imp.clone()));

    let mut queue = DiagnosticQueue::new();
    let map = graph
        .finalize(&mut queue)
        .unwrap_or_else(|_| panic!("finalize failed"));
    let verifier = ConstructorVerifier::new(&graph, &map);
    let plan = ResolverPlan::build(&map, &verifier);

    let mut container = PlanContainer::new(&plan);
    container.provide(&imp, |_| Rc::new(Impl));
    let via_api: Rc<Impl> = resolve(&mut container, &api);
    let via_base: Rc<Impl> = resolve(&mut container, &base);
    let direct: Rc<Impl> = resolve(&mut container, &imp);
    assert!(Rc::ptr_eq(&via_api, &via_base));
    assert!(Rc::ptr_eq(&via_api, &direct));
}

#[test]
fn test_ambiguous_interface_is_unknown_at_dispatch() {
    let j = Symbol::new("api.ts", "J");
    let x = Symbol::new("x.ts", "X");
    let y = Symbol::new("y.ts", "Y");
    let mut graph = ResolutionGraph::new();
    graph.add_interfaces([InterfaceHeritage::new(j.clone())]);
    graph.add_classes([
        ClassHeritage::new(x.clone()).implementing(j.clone()),
        ClassHeritage::new(y.clone()).implementing(j.clone()),
    ]);
    graph.register(&RegistrationIntent::factory(x.clone()));
    graph.register(&RegistrationIntent::factory(y.clone()));

    let mut queue = DiagnosticQueue::new();
    let map = graph
        .finalize(&mut queue)
        .unwrap_or_else(|_| panic!("finalize failed"));
    let verifier = ConstructorVerifier::new(&graph, &map);
    let plan = ResolverPlan::build(&map, &verifier);

    let mut container = PlanContainer::new(&plan);
    container.provide(&x, |_| Rc::new(1u8)).provide(&y, |_| Rc::new(2u8));
    assert!(matches!(
        container.resolve(j.id().as_str()),
        Err(ResolveError::Unknown(_))
    ));
    assert_eq!(*resolve::<u8>(&mut container, &y), 2);
}

#[test]
fn test_null_and_intersection_arguments() {
    let owner = Symbol::new("o.ts", "Owner");
    let left = Symbol::new("l.ts", "Left");
    let right = Symbol::new("r.ts", "Right");
    let missing = Symbol::new("m.ts", "Missing");
    let mut graph = ResolutionGraph::new();
    for symbol in [&owner, &left, &right] {
        graph.add_classes([ClassHeritage::new(symbol.clone())]);
        graph.register(&RegistrationIntent::factory(symbol.clone()));
    }

    let mut queue = DiagnosticQueue::new();
    let map = graph
        .finalize(&mut queue)
        .unwrap_or_else(|_| panic!("finalize failed"));
    let mut verifier = ConstructorVerifier::new(&graph, &map);
    verifier.add_constructors([ConstructorSignature::new(
        owner.clone(),
        vec![
            ParamType::Union(vec![missing]),
            ParamType::Intersection(vec![left.clone(), right.clone()]),
        ],
    )]);
    let plan = ResolverPlan::build(&map, &verifier);

    let mut container = PlanContainer::new(&plan);
    container
        .provide(&left, |_| Rc::new("left"))
        .provide(&right, |_| Rc::new("right"))
        .provide(&owner, |args| {
            let members = match &args[1] {
                Arg::All(members) => members.len(),
                _ => 0,
            };
            Rc::new((args[0].is_null(), members))
        });
    let seen: Rc<(bool, usize)> = resolve(&mut container, &owner);
    assert_eq!(*seen, (true, 2));
}
