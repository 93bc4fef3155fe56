use super::*;
use nalgebra::vector;
use proptest::prelude::*;

fn unit_square_at(x: f64, y: f64) -> Polygon {
    Bounds::new(x, y, x + 1.0, y + 1.0).to_polygon()
}

/// 3x3 block with a 1x2 notch cut from the top middle.
fn u_shape() -> Polygon {
    Polygon::from_xy(&[
        (0.0, 0.0),
        (3.0, 0.0),
        (3.0, 3.0),
        (2.0, 3.0),
        (2.0, 1.0),
        (1.0, 1.0),
        (1.0, 3.0),
        (0.0, 3.0),
    ])
}

fn star(center: Vec2, r_outer: f64, r_inner: f64, tips: usize) -> Polygon {
    let n = 2 * tips;
    Polygon::from_exterior(
        (0..n)
            .map(|k| {
                let th = std::f64::consts::TAU * k as f64 / n as f64;
                let r = if k % 2 == 0 { r_outer } else { r_inner };
                center + vector![th.cos(), th.sin()] * r
            })
            .collect(),
    )
}

#[test]
fn construction_orients_and_opens_rings() {
    // Clockwise input with a repeated closing vertex.
    let p = Polygon::new(
        vec![
            vector![0.0, 0.0],
            vector![0.0, 4.0],
            vector![4.0, 4.0],
            vector![4.0, 0.0],
            vector![0.0, 0.0],
        ],
        vec![vec![
            vector![1.0, 1.0],
            vector![2.0, 1.0],
            vector![2.0, 2.0],
            vector![1.0, 2.0],
        ]],
    );
    assert_eq!(p.exterior().len(), 4);
    assert!(ring_signed_area(p.exterior()) > 0.0);
    assert!(ring_signed_area(&p.interiors()[0]) < 0.0);
    assert!((p.area() - 15.0).abs() < 1e-12);
    assert!((p.perimeter() - 20.0).abs() < 1e-12);
}

#[test]
fn locate_distinguishes_interior_boundary_exterior() {
    let p = Polygon::new(
        Bounds::new(0.0, 0.0, 4.0, 4.0).to_polygon().exterior().to_vec(),
        vec![Bounds::new(1.0, 1.0, 2.0, 2.0).to_polygon().exterior().to_vec()],
    );
    let tol = 1e-9;
    assert_eq!(p.locate(vector![3.0, 3.0], tol), Location::Interior);
    assert_eq!(p.locate(vector![4.0, 2.0], tol), Location::Boundary);
    assert_eq!(p.locate(vector![1.5, 1.0], tol), Location::Boundary);
    assert_eq!(p.locate(vector![1.5, 1.5], tol), Location::Exterior);
    assert_eq!(p.locate(vector![5.0, 1.0], tol), Location::Exterior);
    assert!(!p.contains_point(vector![0.0, 0.0]));
}

#[test]
fn centroid_follows_translation() {
    let sq = unit_square_at(-500.5, 122.5);
    let c = sq.centroid().unwrap();
    assert!((c - vector![-500.0, 123.0]).norm() < 1e-9);
    let moved = sq.translate(600.0, -23.0);
    assert!((moved.centroid().unwrap() - vector![100.0, 100.0]).norm() < 1e-9);
    assert!((moved.area() - sq.area()).abs() < 1e-12);
    assert!(Polygon::default().centroid().is_none());
}

#[test]
fn interpolate_clamps_to_line() {
    let l = LineString::from_xy(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]);
    assert!((l.length() - 7.0).abs() < 1e-12);
    assert_eq!(l.interpolate(-1.0), Some(vector![0.0, 0.0]));
    assert_eq!(l.interpolate(5.0), Some(vector![3.0, 2.0]));
    assert_eq!(l.interpolate(100.0), Some(vector![3.0, 4.0]));
    assert_eq!(LineString::default().interpolate(1.0), None);
}

#[test]
fn box_halfplanes_are_bounded_and_contradictions_empty() {
    let b = ConvexPoly::from_bounds(&Bounds::new(0.0, 0.0, 2.0, 1.0));
    assert!(b.halfplane_intersection().is_bounded());
    let verts = b.vertices().expect("bounded box");
    assert_eq!(verts.len(), 4);
    assert!((ring_signed_area(&verts) - 2.0).abs() < 1e-12);

    // x <= 0 and x >= 1 -> empty
    let mut p = ConvexPoly::default();
    p.insert_halfplane(Halfplane::new(vector![1.0, 0.0], 0.0));
    p.insert_halfplane(Halfplane::new(vector![-1.0, 0.0], -1.0));
    assert!(p.halfplane_intersection().is_empty());
    assert!(!p.halfplane_intersection().is_bounded());

    // A single half-plane is unbounded.
    let mut q = ConvexPoly::default();
    q.insert_halfplane(Halfplane::new(vector![0.0, 1.0], 3.0));
    assert!(matches!(
        q.halfplane_intersection(),
        HalfplaneIntersection::Unbounded
    ));
}

#[test]
fn intersect_of_boxes_is_their_overlap() {
    let a = ConvexPoly::from_bounds(&Bounds::new(0.0, 0.0, 2.0, 2.0));
    let b = ConvexPoly::from_bounds(&Bounds::new(1.0, 1.0, 3.0, 3.0));
    let ab = a.intersect(&b).to_polygon().unwrap();
    assert!((ab.area() - 1.0).abs() < 1e-12);
    let b = ab.bounds();
    assert!((b.min_x - 1.0).abs() < 1e-12 && (b.max_y - 2.0).abs() < 1e-12);
}

#[test]
fn hull_drops_interior_points() {
    let pts = vec![
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![0.5, 0.5],
        vector![1.0, 1.0],
        vector![0.0, 1.0],
    ];
    let hull = convex_hull(&pts).unwrap();
    assert_eq!(hull.len(), 4);
    let cp = ConvexPoly::from_points(&pts).unwrap();
    assert!(cp.contains_eps(vector![0.5, 0.5], 0.0));
    assert!(!cp.contains_eps(vector![1.5, 0.5], 0.0));
}

#[test]
fn bisector_keeps_the_near_side() {
    let h = Halfplane::bisector(vector![0.0, 0.0], vector![2.0, 0.0]);
    assert!(h.satisfies_eps(vector![0.9, 5.0], 0.0));
    assert!(!h.satisfies_eps(vector![1.1, -5.0], 0.0));
}

#[test]
fn clip_square_by_box() {
    let sq = unit_square_at(0.0, 0.0);
    let cut = ConvexPoly::from_bounds(&Bounds::new(0.5, -1.0, 2.0, 2.0));
    let out = clip_convex(&sq, &cut);
    assert_eq!(out.num_parts(), 1);
    assert!((out.area() - 0.5).abs() < 1e-12);
    assert_eq!(out.0[0].exterior().len(), 4);
}

#[test]
fn clip_fully_inside_returns_subject() {
    let sq = unit_square_at(0.0, 0.0);
    let cut = ConvexPoly::from_bounds(&Bounds::new(-1.0, -1.0, 2.0, 2.0));
    assert_eq!(clip_convex(&sq, &cut), MultiPolygon::from(sq));
}

#[test]
fn clip_disjoint_is_empty() {
    let sq = unit_square_at(0.0, 0.0);
    let cut = ConvexPoly::from_bounds(&Bounds::new(5.0, 5.0, 6.0, 6.0));
    assert!(clip_convex(&sq, &cut).is_empty());
}

#[test]
fn clip_splits_u_shape_into_arms() {
    let u = u_shape();
    assert!((u.area() - 7.0).abs() < 1e-12);
    let top = ConvexPoly::from_bounds(&Bounds::new(-1.0, 2.0, 4.0, 4.0));
    let arms = clip_convex(&u, &top);
    assert_eq!(arms.num_parts(), 2);
    for arm in arms.iter() {
        assert!((arm.area() - 1.0).abs() < 1e-12);
        assert!(arm.interiors().is_empty());
    }
}

#[test]
fn clip_through_hole_keeps_notch() {
    let holed = Polygon::new(
        Bounds::new(0.0, 0.0, 4.0, 4.0).to_polygon().exterior().to_vec(),
        vec![Bounds::new(1.0, 1.0, 3.0, 3.0).to_polygon().exterior().to_vec()],
    );
    // Left half: a C-shape of area 8 - 2 = 6.
    let left = ConvexPoly::from_bounds(&Bounds::new(-1.0, -1.0, 2.0, 5.0));
    let out = clip_convex(&holed, &left);
    assert_eq!(out.num_parts(), 1);
    assert!((out.area() - 6.0).abs() < 1e-12);
    // Box strictly inside the hole.
    let inner = ConvexPoly::from_bounds(&Bounds::new(1.5, 1.5, 2.5, 2.5));
    assert!(clip_convex(&holed, &inner).is_empty());
}

#[test]
fn dissolve_merges_shared_edges() {
    let pieces = vec![
        unit_square_at(0.0, 0.0),
        unit_square_at(1.0, 0.0),
        unit_square_at(0.0, 1.0),
        unit_square_at(1.0, 1.0),
    ];
    let merged = dissolve(&pieces);
    assert_eq!(merged.num_parts(), 1);
    assert!((merged.area() - 4.0).abs() < 1e-12);
    assert_eq!(merged.0[0].exterior().len(), 4);
}

#[test]
fn dissolve_recovers_enclosed_hole() {
    let mut pieces = Vec::new();
    for i in 0..3 {
        for j in 0..3 {
            if (i, j) != (1, 1) {
                pieces.push(unit_square_at(i as f64, j as f64));
            }
        }
    }
    let ring = dissolve(&pieces);
    assert_eq!(ring.num_parts(), 1);
    assert_eq!(ring.0[0].interiors().len(), 1);
    assert!((ring.area() - 8.0).abs() < 1e-12);
    assert!(!ring.contains_point(vector![1.5, 1.5]));
    assert!(ring.contains_point(vector![0.5, 1.5]));
}

#[test]
fn dissolve_keeps_corner_touching_pieces_apart() {
    let pieces = vec![unit_square_at(0.0, 0.0), unit_square_at(1.0, 1.0)];
    let out = dissolve(&pieces);
    assert_eq!(out.num_parts(), 2);
    assert!((out.area() - 2.0).abs() < 1e-12);
}

#[test]
fn dissolve_handles_t_junctions() {
    // One 2x1 block next to two unit squares stacked on its right.
    let pieces = vec![
        Bounds::new(0.0, 0.0, 1.0, 2.0).to_polygon(),
        unit_square_at(1.0, 0.0),
        unit_square_at(1.0, 1.0),
    ];
    let out = dissolve(&pieces);
    assert_eq!(out.num_parts(), 1);
    assert!((out.area() - 4.0).abs() < 1e-12);
    assert_eq!(out.0[0].exterior().len(), 4);
}

#[test]
fn segment_clipping_through_notch() {
    let u = u_shape();
    let parts = clip_segment(vector![-1.0, 2.5], vector![4.0, 2.5], &u);
    assert_eq!(parts.len(), 2);
    assert!((parts[0].length() - 1.0).abs() < 1e-12);
    assert!((parts[0].start().unwrap() - vector![0.0, 2.5]).norm() < 1e-12);
    assert!((parts[1].end().unwrap() - vector![3.0, 2.5]).norm() < 1e-12);
    let below = clip_segment(vector![-1.0, 0.5], vector![4.0, 0.5], &u);
    assert_eq!(below.len(), 1);
    assert!((below[0].length() - 3.0).abs() < 1e-12);
}

#[test]
fn intersects_counts_touching() {
    let a = unit_square_at(0.0, 0.0);
    assert!(intersects(&a, &unit_square_at(1.0, 0.0)));
    assert!(intersects(&a, &unit_square_at(1.0, 1.0)));
    assert!(!intersects(&a, &unit_square_at(1.5, 0.0)));
    let big = Bounds::new(-5.0, -5.0, 5.0, 5.0).to_polygon();
    assert!(intersects(&a, &big));
    assert!(intersects(&big, &a));
    // Crossing without any vertex inside the other.
    let wide = Bounds::new(-1.0, 0.4, 2.0, 0.6).to_polygon();
    let tall = Bounds::new(0.4, -1.0, 0.6, 2.0).to_polygon();
    assert!(intersects(&wide, &tall));
}

#[test]
fn contact_kinds() {
    let a = unit_square_at(0.0, 0.0);
    assert_eq!(contact(&a, &unit_square_at(1.0, 0.0), 1e-9), Contact::Edge);
    assert_eq!(contact(&a, &unit_square_at(1.0, 1.0), 1e-9), Contact::Point);
    assert_eq!(contact(&a, &unit_square_at(2.0, 0.0), 1e-9), Contact::None);
    // Partial edge overlap still counts as an edge.
    assert_eq!(contact(&a, &unit_square_at(1.0, 0.5), 1e-9), Contact::Edge);
}

#[test]
fn snapping_moves_only_near_vertices() {
    let reference = unit_square_at(0.0, 0.0);
    let mut target = Polygon::from_xy(&[(1.0 + 1e-6, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0 - 1e-6)]);
    snap_vertices(&mut target, &reference, 1e-3);
    assert!(target.exterior().contains(&vector![1.0, 0.0]));
    assert!(target.exterior().contains(&vector![1.0, 1.0]));
    assert!(target.exterior().contains(&vector![2.0, 0.0]));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Cutting a star into quadrants around an interior point conserves area,
    /// and dissolving the quadrants gives the star back.
    #[test]
    fn quadrant_cuts_conserve_area(
        cx in -50.0f64..50.0,
        cy in -50.0f64..50.0,
        r_outer in 1.0f64..20.0,
        ratio in 0.2f64..0.9,
        tips in 3usize..9,
        fx in -0.1f64..0.1,
        fy in -0.1f64..0.1,
    ) {
        let center = vector![cx, cy];
        let s = star(center, r_outer, r_outer * ratio, tips);
        let split = center + vector![fx, fy] * r_outer;
        let big = 4.0 * r_outer;
        let quadrants = [
            Bounds::new(split.x, split.y, split.x + big, split.y + big),
            Bounds::new(split.x - big, split.y, split.x, split.y + big),
            Bounds::new(split.x - big, split.y - big, split.x, split.y),
            Bounds::new(split.x, split.y - big, split.x + big, split.y),
        ];
        let pieces: Vec<MultiPolygon> = quadrants
            .iter()
            .map(|q| clip_convex(&s, &ConvexPoly::from_bounds(q)))
            .collect();
        let total: f64 = pieces.iter().map(|p| p.area()).sum();
        let rel = (total - s.area()).abs() / s.area();
        prop_assert!(rel < 1e-9, "rel error {}", rel);

        let merged = dissolve(&pieces);
        prop_assert_eq!(merged.num_parts(), 1);
        prop_assert!((merged.area() - s.area()).abs() / s.area() < 1e-9);
    }
}
