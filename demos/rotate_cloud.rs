use uom::si::angle::degree;
use uom::si::f64::Angle;
use versor::math::{compose, rotate_points};
use versor::{AxisAngle, RotationMatrix, Vector3};

fn main() {
    // a handful of points sampled from the edges of a unit cube
    let cloud = [
        [1., 0., 0.],
        [1., 1., 0.],
        [0., 1., 0.],
        [0., 1., 1.],
        [0., 0., 1.],
        [1., 0., 1.],
        [1., 1., 1.],
    ];

    // first tilt the cloud 30° about x, then spin it 45° about z
    let tilt = AxisAngle::new(Vector3::x(), Angle::new::<degree>(30.));
    let spin = AxisAngle::new(Vector3::z(), Angle::new::<degree>(45.));

    let tilt = tilt.to_quaternion().expect("x axis and 30° make a rotation");
    let spin = spin.to_quaternion().expect("z axis and 45° make a rotation");

    // composing keeps us in quaternion land; the order is (second, first)
    let both = compose(&spin, &tilt);
    println!("{both}");

    let as_axis_angle = both
        .to_axis_angle()
        .expect("composition of two rotations is a rotation");
    println!("or equivalently {as_axis_angle}");

    let rotated = rotate_points(cloud, &both);
    for (before, after) in cloud.iter().zip(&rotated) {
        println!("{before:?} -> [{:.4}, {:.4}, {:.4}]", after.x, after.y, after.z);
    }

    // a matrix that is not a rotation is rejected, so nothing comes out the other end
    let squash = RotationMatrix::from_rows([[1., 0., 0.], [0., 1., 0.], [0., 0., 0.]]);
    assert!(rotate_points(cloud, &squash).is_empty());
}
