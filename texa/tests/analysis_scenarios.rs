// Scenario tests for the four analyses over hand-built trees.
//
// Each test builds a small kernel the way a lowering stage would emit it
// (loops over flat buffers fed by loads and tensor calls) and checks the
// query results through the public API only.

use texa::buffer_map::{buffer_map, CreateBufferMap};
use texa::builder::IrBuilder;
use texa::has_rand::{has_rand, HasRand};
use texa::ir::*;
use texa::node_finder::{find, NodeFinder};
use texa::var_finder::{find_vars, VarFinder};

// ── Fixtures ────────────────────────────────────────────────────────────────

/// Flattening kernel for a 2x3 input, a tensor-valued output and a dropout
/// mask drawn with `rand()`:
///
///   for i in 0..2 { for j in 0..3 {
///       in_flat[i*3 + j]  = in[i, j];
///       out_flat[i*3 + j] = out(i, j);
///       mask[i*3 + j]     = (rand() < 0.5 ? 0.0 : 1.0);
///   } }
struct Kernel {
    root: Stmt,
    i: Var,
    j: Var,
    input: Buf,
    in_flat: Buf,
    out: Tensor,
    out_flat: Buf,
    mask: Buf,
}

fn kernel() -> Kernel {
    let mut b = IrBuilder::new();
    let i = b.var("i", Dtype::Int);
    let j = b.var("j", Dtype::Int);
    let input = b.buf("in", vec![Expr::int(2), Expr::int(3)], Dtype::Float);
    let out = b.tensor("out", vec![Expr::int(2), Expr::int(3)], Dtype::Float);
    let in_flat = b.flat_buf("in_flat", 6, Dtype::Float);
    let out_flat = b.flat_buf("out_flat", 6, Dtype::Float);
    let mask = b.flat_buf("mask", 6, Dtype::Float);

    let flat_idx = || Expr::add(Expr::mul(Expr::var(&i), Expr::int(3)), Expr::var(&j));
    let body = Stmt::block(vec![
        Stmt::store(
            &in_flat,
            vec![flat_idx()],
            Expr::load(&input, vec![Expr::var(&i), Expr::var(&j)]),
        ),
        Stmt::store(
            &out_flat,
            vec![flat_idx()],
            Expr::call(&out, vec![Expr::var(&i), Expr::var(&j)]),
        ),
        Stmt::store(
            &mask,
            vec![flat_idx()],
            Expr::compare_select(
                CompareSelectOperation::Lt,
                Expr::rand(),
                Expr::float(0.5),
                Expr::float(0.0),
                Expr::float(1.0),
            ),
        ),
    ]);
    let inner = Stmt::for_loop(&j, Expr::int(0), Expr::int(3), body);
    let root = Stmt::for_loop(&i, Expr::int(0), Expr::int(2), inner);

    Kernel {
        root,
        i,
        j,
        input,
        in_flat,
        out,
        out_flat,
        mask,
    }
}

// ── Randomness detector ─────────────────────────────────────────────────────

#[test]
fn kernel_draws_random_numbers() {
    let k = kernel();
    assert!(has_rand(&k.root));
}

#[test]
fn rand_under_non_random_intrinsic_is_found() {
    let mut b = IrBuilder::new();
    let out = b.flat_buf("out", 1, Dtype::Float);
    let root = Stmt::store(
        &out,
        vec![Expr::int(0)],
        Expr::intrinsic(IntrinsicsOp::Log, vec![Expr::rand()]),
    );
    assert!(HasRand::new(&root).has_rand());
}

#[test]
fn detector_agrees_with_collector() {
    let k = kernel();
    let via_collector = find::<Intrinsics>(&k.root)
        .iter()
        .any(|i| i.op == IntrinsicsOp::Rand);
    assert_eq!(has_rand(&k.root), via_collector);

    let mut b = IrBuilder::new();
    let out = b.flat_buf("out", 1, Dtype::Float);
    let calm = Stmt::store(
        &out,
        vec![Expr::int(0)],
        Expr::intrinsic(IntrinsicsOp::Tanh, vec![Expr::float(0.3)]),
    );
    let via_collector = find::<Intrinsics>(&calm)
        .iter()
        .any(|i| i.op == IntrinsicsOp::Rand);
    assert!(!via_collector);
    assert_eq!(has_rand(&calm), via_collector);
}

// ── Typed node collector ────────────────────────────────────────────────────

#[test]
fn collector_counts_match_kernel_structure() {
    let k = kernel();
    assert_eq!(find::<For>(&k.root).len(), 2);
    assert_eq!(find::<Block>(&k.root).len(), 1);
    assert_eq!(find::<Store>(&k.root).len(), 3);
    assert_eq!(find::<Load>(&k.root).len(), 1);
    assert_eq!(find::<FunctionCall>(&k.root).len(), 1);
    assert_eq!(find::<Intrinsics>(&k.root).len(), 1);
    assert_eq!(find::<CompareSelect>(&k.root).len(), 1);
    assert!(find::<Cond>(&k.root).is_empty());
}

#[test]
fn collector_preserves_store_order() {
    let k = kernel();
    let targets: Vec<_> = find::<Store>(&k.root)
        .iter()
        .map(|s| s.buf.id)
        .collect();
    assert_eq!(targets, vec![k.in_flat.id, k.out_flat.id, k.mask.id]);
}

#[test]
fn collector_is_deterministic() {
    let k = kernel();
    let first: Vec<*const Var> = NodeFinder::<Var>::new(&k.root)
        .nodes()
        .iter()
        .map(|v| *v as *const Var)
        .collect();
    let second: Vec<*const Var> = find::<Var>(&k.root)
        .into_iter()
        .map(|v| v as *const Var)
        .collect();
    assert_eq!(first, second);
}

// ── Variable collector ──────────────────────────────────────────────────────

#[test]
fn kernel_variables() {
    let k = kernel();
    let vars = find_vars(&k.root);
    for id in [
        k.i.id,
        k.j.id,
        k.input.base.id,
        k.in_flat.base.id,
        k.out_flat.base.id,
        k.mask.base.id,
    ] {
        assert!(vars.contains(&id), "missing {:?}", id);
    }
    // The tensor's buffer is only reached through the call's params, never
    // as a buffer node.
    assert!(!vars.contains(&k.out.buf.base.id));
    assert_eq!(vars.len(), 6);
}

#[test]
fn shadowed_names_stay_distinct() {
    let mut b = IrBuilder::new();
    let outer = b.var("i", Dtype::Int);
    let inner = b.var("i", Dtype::Int);
    let out = b.buf("out", vec![Expr::int(2), Expr::int(2)], Dtype::Int);
    let store = Stmt::store(
        &out,
        vec![Expr::var(&outer), Expr::var(&inner)],
        Expr::int(1),
    );
    let root = Stmt::for_loop(
        &outer,
        Expr::int(0),
        Expr::int(2),
        Stmt::for_loop(&inner, Expr::int(0), Expr::int(2), store),
    );
    let finder = VarFinder::new(&root);
    let named_i = finder.vars().values().filter(|v| v.name == "i").count();
    assert_eq!(named_i, 2);
}

// ── Buffer correspondence ───────────────────────────────────────────────────

#[test]
fn kernel_buffer_map() {
    let k = kernel();
    let mapper = CreateBufferMap::new(&k.root);
    let map = mapper.buffer_map();
    assert_eq!(map.len(), 2);
    assert_eq!(map["in"].id, k.in_flat.id);
    assert_eq!(map["out"].id, k.out_flat.id);
    // The mask store has neither a load nor a call as its value.
    assert!(mapper.get("mask").is_none());
}

#[test]
fn later_conflicting_store_is_ignored() {
    let mut b = IrBuilder::new();
    let buf_a = b.flat_buf("BufA", 4, Dtype::Float);
    let buf_b = b.buf("BufB", vec![Expr::int(2), Expr::int(2)], Dtype::Float);
    let buf_c = b.flat_buf("BufC", 4, Dtype::Float);
    let i = b.var("i", Dtype::Int);
    let root = Stmt::block(vec![
        Stmt::store(&buf_a, vec![Expr::int(0)], Expr::load(&buf_b, vec![Expr::int(0), Expr::int(0)])),
        Stmt::for_loop(
            &i,
            Expr::int(0),
            Expr::int(4),
            Stmt::store(&buf_c, vec![Expr::var(&i)], Expr::load(&buf_b, vec![Expr::int(1), Expr::int(1)])),
        ),
    ]);
    let map = buffer_map(&root);
    assert_eq!(map["BufB"].id, buf_a.id);
    assert_ne!(map["BufB"].id, buf_c.id);
}

#[test]
fn call_maps_logical_name_to_flat_destination() {
    let mut b = IrBuilder::new();
    let t = b.tensor("BufLogical", vec![Expr::int(3), Expr::int(3)], Dtype::Float);
    let flat = b.flat_buf("BufFlat", 9, Dtype::Float);
    let root = Stmt::store(&flat, vec![Expr::int(4)], Expr::call(&t, vec![Expr::int(1), Expr::int(1)]));
    let map = buffer_map(&root);
    assert_eq!(map[t.buf.name_hint()].id, flat.id);
}

#[test]
fn empty_tree_gives_empty_results() {
    let root = Stmt::block(vec![]);
    assert!(!has_rand(&root));
    assert!(find::<Store>(&root).is_empty());
    assert!(find_vars(&root).is_empty());
    assert!(buffer_map(&root).is_empty());
}

// ── Repeatability and sharing ───────────────────────────────────────────────

#[test]
fn analyses_are_idempotent() {
    let k = kernel();
    assert_eq!(has_rand(&k.root), has_rand(&k.root));
    assert_eq!(find_vars(&k.root), find_vars(&k.root));

    let ids = |m: std::collections::HashMap<String, &Buf>| {
        let mut v: Vec<_> = m.into_iter().map(|(k, b)| (k, b.id)).collect();
        v.sort();
        v
    };
    assert_eq!(ids(buffer_map(&k.root)), ids(buffer_map(&k.root)));
}

#[test]
fn independent_analyses_share_one_tree_across_threads() {
    let k = kernel();
    let root = &k.root;
    let (rand, vars, stores) = std::thread::scope(|s| {
        let rand = s.spawn(|| has_rand(root));
        let vars = s.spawn(|| find_vars(root));
        let stores = s.spawn(|| find::<Store>(root).len());
        (
            rand.join().unwrap(),
            vars.join().unwrap(),
            stores.join().unwrap(),
        )
    });
    assert_eq!(rand, has_rand(root));
    assert_eq!(vars, find_vars(root));
    assert_eq!(stores, 3);
}
